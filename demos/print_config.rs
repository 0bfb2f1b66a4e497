use search_buildcfg::build::DEFAULT_ENV_PREFIX;
use search_buildcfg::{load_layered, DeployTarget};

fn main() -> Result<(), search_buildcfg::Error> {
    let target = match std::env::args().nth(1).as_deref() {
        Some("component") => DeployTarget::SearchComponent,
        _ => DeployTarget::Search,
    };

    // defaults -> demos/vite.toml (optional) -> BUILD__* environment
    let config = load_layered(target, "demos/vite.toml", DEFAULT_ENV_PREFIX)?;

    println!(
        "serving {} on port {} (open browser: {})",
        config.base_path(),
        config.server_port(),
        config.auto_open()
    );
    print!("{}", config.to_toml_string()?);

    Ok(())
}
