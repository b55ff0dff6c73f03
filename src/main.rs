use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use log::{debug, info, warn};
use metrics_exporter_prometheus::PrometheusBuilder;
use tokio_stream::StreamExt;

use claim_drop::{
    config::Options,
    page::{clamp_quantity, ClaimPage},
    source::{collect_snapshot, ClaimData, JsonFileSource},
    utils::setup_logger,
    watch::{ClaimInputs, ClaimSession},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize environment and logging
    dotenv::dotenv().ok();
    let opt = Options::parse();
    setup_logger(&opt.log_level)?;
    opt.validate()?;

    let metrics = if opt.metrics {
        Some(
            PrometheusBuilder::new()
                .install_recorder()
                .context("failed to install metrics recorder")?,
        )
    } else {
        None
    };

    info!("token drop {:?}", opt.token_address);
    if opt.watch {
        watch(&opt).await?;
    } else {
        let data = load(&opt).await?;
        let inputs = ClaimInputs {
            snapshot: data.snapshot,
            quantity: opt.quantity,
        };
        let page = ClaimPage::new(&data.metadata, &inputs.snapshot, opt.quantity, inputs.derive());
        print_page(&page, opt.json)?;
    }

    if let Some(handle) = metrics {
        println!("{}", handle.render());
    }
    Ok(())
}

async fn load(opt: &Options) -> Result<ClaimData> {
    let source = JsonFileSource::read(&opt.snapshot).await?;
    debug!("read claim data from {:?}", source.path());
    Ok(collect_snapshot(&source, opt.token_address, opt.wallet, opt.quantity))
}

fn print_page(page: &ClaimPage, json: bool) -> Result<()> {
    let bounded = clamp_quantity(page.quantity, &page.state.max_claimable);
    if bounded != page.quantity {
        warn!(
            "quantity {} is outside the claimable range, the page would allow {bounded}",
            page.quantity
        );
    }

    if json {
        println!("{}", serde_json::to_string_pretty(page)?);
    } else {
        println!("{page}");
        if page.claim_enabled() {
            println!("{}", "Eligible to claim".green());
        } else {
            println!("{}", "Not eligible to claim".red());
        }
    }
    Ok(())
}

async fn watch(opt: &Options) -> Result<()> {
    let data = load(opt).await?;
    let mut metadata = data.metadata;
    let session = ClaimSession::spawn(data.snapshot, opt.quantity);
    let mut states = session.stream();

    let mut interval = tokio::time::interval(opt.poll_interval());
    interval.tick().await;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    info!("watching {:?} every {:?}", opt.snapshot, opt.poll_interval());
    loop {
        tokio::select! {
            Some(derived) = states.next() => {
                let page = ClaimPage::new(
                    &metadata,
                    &derived.inputs.snapshot,
                    derived.inputs.quantity,
                    derived.state,
                );
                print_page(&page, opt.json)?;
            }
            _ = interval.tick() => match load(opt).await {
                Ok(data) => {
                    metadata = data.metadata;
                    session.update_snapshot(data.snapshot);
                }
                Err(err) => warn!("keeping previous claim data: {err:#}"),
            },
            _ = &mut ctrl_c => {
                info!("interrupted, stopping");
                break;
            }
        }
    }

    session.shutdown().await;
    Ok(())
}
