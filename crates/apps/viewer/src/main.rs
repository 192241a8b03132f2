use anyhow::Context;
use clap::Parser;
use scene::camera::Viewport;
use scene::selection::Transition;
use tokio::io::AsyncReadExt;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use viewer::script::parse_script;
use viewer::{AppContext, Args, DetailPanel, Loader, Source, ViewerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    let geo = Source::parse(&args.geo_source());
    let rosters: Vec<Source> = args
        .roster_sources()
        .iter()
        .map(|s| Source::parse(s))
        .collect();

    let datasets = match Loader::new().load_all(&geo, &rosters).await {
        Ok(datasets) => datasets,
        Err(err) => {
            error!(%err, "dataset load failed; no scene built");
            return Err(err.into());
        }
    };

    let viewport = Viewport::full_window(args.width, args.height);
    let (mut ctx, report) = AppContext::build(&config, viewport, &datasets);
    for name in &report.unmatched {
        println!("unmatched region: {name}");
    }
    let mut panel = DetailPanel::new(datasets.roster);

    let events = match &args.events {
        Some(location) => parse_script(&read_script(location).await?)?,
        None => Vec::new(),
    };
    info!(events = events.len(), "replaying pointer script");

    for event in &events {
        match event.apply(&mut ctx, &mut panel) {
            None | Some(Transition::Unchanged) => {}
            Some(_) => match panel.view() {
                Some(view) => print!("{view}"),
                None => println!("(panel hidden)"),
            },
        }
        for traced in ctx.drain_events() {
            debug!(
                frame = traced.frame_index,
                kind = traced.kind.as_str(),
                message = %traced.message,
                "event"
            );
        }
    }

    let frame = ctx.tick(0.0);
    info!(
        regions = ctx.registry().len(),
        draw_commands = frame.commands.len(),
        output_width = frame.output_size.0,
        output_height = frame.output_size.1,
        "done"
    );
    Ok(())
}

async fn read_script(location: &str) -> anyhow::Result<String> {
    if location == "-" {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("reading event script from stdin")?;
        Ok(text)
    } else {
        tokio::fs::read_to_string(location)
            .await
            .with_context(|| format!("reading event script {location}"))
    }
}
