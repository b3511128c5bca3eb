use markercluster_config::alter::example::mapnik_cluster_alter;
use markercluster_config::{MapInfo, ProfileLoader, Profiles, ValidationMode};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), markercluster_config::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")))
        .init();

    let base = ProfileLoader::builder()
        .with_file("demos/maps.toml", true)
        .with_env("MARKERCLUSTER", "__")
        .load()?;

    let info = MapInfo::builder()
        .with_profiles(base)
        .with_alter("mapnik clustering", mapnik_cluster_alter)
        .with_alter("tighter clusters", |profiles: &mut Profiles| {
            profiles
                .entry("OSM Mapnik")
                .settings
                .set("maxClusterRadius", 50);
        })
        .build()?;

    if let Err(e) = info.profiles().validate(ValidationMode::Strict) {
        tracing::warn!("{e}");
    }

    let json = info.to_json()?;
    println!("{}", serde_json::to_string_pretty(&json)?);

    Ok(())
}
