use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let loaded = crm_pipeline_lib::config::load().context("loading configuration")?;
    let config = loaded.config;

    rolling_logger::init_logger_with(
        config.logging.dir.clone(),
        "crm-pipeline",
        &config.logging.level,
        config.logging.max_files,
    )
    .context("initializing logger")?;

    for warning in &loaded.warnings {
        log::warn!("{}", warning);
    }

    crm_pipeline_lib::run(config).await
}
