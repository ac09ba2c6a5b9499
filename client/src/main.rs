//! `compass` entry point: wires configuration, adapters and the domain.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultClock;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use compass::config::ClientSettings;
use compass::domain::ports::ContentViewSink;
use compass::domain::{
    ActionDetailService, AuthHeaders, DetailViewController, DeviceRegistration, EntityFetcher,
    EntityId, ListState, RewardService, UnseenAwards, UserGoalDetail, ViewState,
};
use compass::inbound::cli::{
    AwardsCommand, CliArgs, CliCommand, render_action, render_awards, render_goal, render_reward,
    render_tab_label,
};
use compass::outbound::analytics::TracingContentViewSink;
use compass::outbound::api::HttpApiGateway;
use compass::outbound::flags::JsonFileFlagStore;

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(std::io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::parse();
    let settings = ClientSettings::load().wrap_err("failed to load configuration")?;

    if let CliCommand::Awards { action } = args.command {
        return run_awards(&settings, action);
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to build Tokio runtime")?;
    runtime.block_on(run_remote(settings, args.command))
}

fn run_awards(settings: &ClientSettings, action: AwardsCommand) -> Result<()> {
    let store = JsonFileFlagStore::open(&settings.flags_dir())
        .wrap_err("failed to open flag store")?;
    let awards = UnseenAwards::new(Arc::new(store));
    let output = match action {
        AwardsCommand::List => render_awards(&awards.list()?),
        AwardsCommand::Count => format!("{}\n", awards.count()?),
        AwardsCommand::Add { id } => {
            awards.add(EntityId::new(id))?;
            render_tab_label(awards.tab_label()?.as_deref())
        }
        AwardsCommand::Ack { id } => {
            render_tab_label(awards.acknowledge(EntityId::new(id))?.as_deref())
        }
    };
    print!("{output}");
    Ok(())
}

async fn run_remote(settings: ClientSettings, command: CliCommand) -> Result<()> {
    let gateway = Arc::new(
        HttpApiGateway::with_user_agent(
            settings.api_base_url()?,
            settings.request_timeout(),
            settings.user_agent(),
        )
        .wrap_err("failed to build HTTP client")?,
    );
    let headers = settings
        .session()?
        .map_or_else(AuthHeaders::anonymous, |session| session.header_map());

    match command {
        CliCommand::Goal { id, retries } => show_goal(gateway, headers, id, retries).await,
        CliCommand::Action { id } => {
            let detail = ActionDetailService::new(gateway, headers)
                .load(EntityId::new(id))
                .await
                .wrap_err_with(|| format!("action {id} could not be loaded"))?;
            print!("{}", render_action(&detail));
            Ok(())
        }
        CliCommand::Reward => {
            let panel = RewardService::new(gateway, headers).panel().await;
            print!("{}", render_reward(&panel));
            Ok(())
        }
        CliCommand::RegisterDevice { token } => {
            DeviceRegistration::new(gateway, headers, settings.device_name())
                .forward_token(&token)
                .await?;
            println!("registered");
            Ok(())
        }
        CliCommand::Awards { .. } => Err(eyre!("awards commands run without the network")),
    }
}

async fn show_goal(
    gateway: Arc<HttpApiGateway>,
    headers: AuthHeaders,
    id: i64,
    retries: u32,
) -> Result<()> {
    let controller = DetailViewController::new(
        UserGoalDetail,
        EntityFetcher::new(gateway),
        headers,
        Arc::new(TracingContentViewSink) as Arc<dyn ContentViewSink>,
        Arc::new(DefaultClock),
    );
    let view = controller.open(EntityId::new(id));
    let mut remaining = retries;

    let settled = loop {
        let snapshot = view
            .wait_until(|s| match s.state {
                ViewState::Error => true,
                ViewState::Content => !matches!(s.list_state, ListState::Idle | ListState::Loading),
                ViewState::Loading => false,
            })
            .await?;
        if snapshot.state != ViewState::Error || remaining == 0 {
            break snapshot;
        }
        remaining -= 1;
        info!(goal_id = id, remaining, "retrying goal load");
        view.retry().await?;
    };

    print!("{}", render_goal(&settled));
    view.dismiss().await;
    if settled.state == ViewState::Error {
        return Err(eyre!("goal {id} could not be loaded"));
    }
    Ok(())
}
