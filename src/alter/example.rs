//! Reference override for the stock `OSM Mapnik` map.
//!
//! Sites register an alter like this one to turn clustering on with their own
//! options. See the Leaflet.markercluster documentation for every option the
//! plugin accepts; keys this crate does not know are forwarded as written.

use crate::{ClusterOption, ClusteringCutoff, IconDescriptor, Point, Profiles, Settings};

pub const OSM_MAPNIK: &str = "OSM Mapnik";

/// Clustering options applied by [`mapnik_cluster_alter`].
pub fn mapnik_cluster_settings() -> Settings {
    let mut settings = Settings::new();
    // Clicking a cluster zooms to the bounds of its markers.
    settings.set_option(ClusterOption::ZoomToBoundsOnClick, true);
    settings.set_option(ClusterOption::ShowCoverageOnHover, true);
    // At the bottom zoom level a click spreads the markers out instead.
    settings.set_option(ClusterOption::SpiderfyOnMaxZoom, true);
    // Off for bulk-adding performance.
    settings.set_option(ClusterOption::AnimateAddingMarkers, false);
    settings.set_option(ClusterOption::DisableClusteringAtZoom, ClusteringCutoff::Never);
    // Pixels from the central marker; smaller values give more, smaller clusters.
    settings.set_option(ClusterOption::MaxClusterRadius, 80);
    settings
}

/// Single icon used for every cluster regardless of its size.
pub fn mapnik_cluster_icon() -> IconDescriptor {
    IconDescriptor::new("/sites/default/files/icon.png")
        .with_size(Point::new(20, 40))
        .with_anchor(Point::new(20, 40))
        .with_popup_anchor(Point::new(-8, -32))
        .with_shadow(
            "/sites/default/files/icon-shadow.png",
            Point::new(25, 27),
            Point::new(0, 27),
        )
}

/// Sets [`mapnik_cluster_settings`] and [`mapnik_cluster_icon`] on `OSM Mapnik`.
///
/// Idempotent: it always writes the same literal values.
pub fn mapnik_cluster_alter(profiles: &mut Profiles) {
    let profile = profiles.entry(OSM_MAPNIK);
    profile.settings.extend(mapnik_cluster_settings());
    profile.set_icon(mapnik_cluster_icon());
}
