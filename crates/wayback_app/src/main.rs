mod banner;
mod proxies;
mod report;
mod settings;
mod storage;
mod username;

use anyhow::Context;
use engine_logging::LogDestination;
use wayback_engine::{LocalImageIndex, Pipeline};

fn main() -> anyhow::Result<()> {
    banner::draw_title();
    engine_logging::initialize(LogDestination::Terminal);

    let account = username::prompt_username()?;

    let home = std::env::current_dir().context("could not determine working directory")?;
    let settings = settings::AppSettings::load_or_default(&home.join(settings::SETTINGS_FILENAME));
    let config = settings.engine_config();

    let dirs = storage::AccountDirs::create(&home, &account)
        .context("unable to create the account image directories")?;

    let proxies = if config.use_proxies {
        let path = home.join("proxies").join("proxies.txt");
        log::info!("loading proxies: {}", path.display());
        let proxies = proxies::load_proxies(&path)
            .with_context(|| format!("could not read proxy list {}", path.display()))?;
        log::info!("loaded {} proxies from file", proxies.len());
        proxies
    } else {
        log::info!("proxies disabled in settings, connecting directly");
        Vec::new()
    };

    let local = LocalImageIndex::scan(&[&dirs.media, &dirs.profile])
        .context("could not scan locally stored images")?;
    if !local.is_empty() {
        log::info!(
            "discovered {} locally stored files - express filtering enabled",
            local.len()
        );
    }

    let pipeline = Pipeline::new(config, proxies)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to build async runtime")?;
    let run = runtime.block_on(pipeline.run(&account, &dirs.root, &local))?;

    log::info!(
        "saved {} images for username: {}",
        run.images_saved,
        run.account
    );
    if !run.failed_pages.is_empty() || !run.failed_images.is_empty() {
        log::warn!(
            "{} pages and {} images could not be retrieved after retries",
            run.failed_pages.len(),
            run.failed_images.len()
        );
    }

    storage::purge_corrupted(&dirs).context("corrupted image sweep failed")?;

    let report_path = report::write_report(&dirs.root, &run)?;
    log::info!("report created: {}", report_path.display());

    Ok(())
}
