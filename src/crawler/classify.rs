//! Resource classification tables and predicates
//!
//! Decides whether a fetched resource is a geospatial data file and whether an
//! element belongs to page chrome that link discovery should ignore.

use scraper::node::Element;
use url::Url;

/// Media types served for downloadable geospatial data
pub const DATASET_MIME_TYPES: &[&str] = &[
    "text/csv",
    "application/csv",
    "application/zip",
    "application/json",
    "application/geo+json",
    "application/x-geotiff",
    "application/x-shapefile",
    "application/x-esri-shape",
    "application/x-filegdb",
    "application/x-esri-geodatabase",
    "application/x-netcdf",
    "application/x-hdf",
    "application/x-hdf5",
    "application/x-hdf4",
    "application/x-grib",
    "application/grib",
    "application/x-bil",
    "application/x-bip",
    "application/x-bsq",
    "application/vnd.las",
    "application/vnd.laz",
    "application/vnd.google-earth.kml+xml",
    "application/vnd.google-earth.kmz",
    "application/x-sqlite3",
    "application/geopackage+sqlite3",
    "application/vnd.ogc.wms_xml",
    "application/vnd.ogc.wfs_xml",
    "application/topo+json",
];

/// File extensions of the same formats, without the leading dot
pub const DATASET_EXTENSIONS: &[&str] = &[
    // Tabular and archives
    "csv", "zip", "json", "geojson", "topojson",
    // Rasters
    "tif", "tiff", "geotiff", "bil", "bip", "bsq",
    // Vector formats
    "shp", "shx", "dbf", "prj", "gdb", "kml", "kmz", "gpkg", "sqlite",
    // Scientific arrays
    "nc", "nc4", "hdf", "hdf4", "hdf5", "h4", "h5", "he5", "grib", "grb", "grib2", "grb2",
    // Point clouds
    "las", "laz",
];

/// Substrings of class, id or role values that mark page chrome
pub const BOILERPLATE_MARKERS: &[&str] = &[
    // Navigation, headers, menus
    "nav",
    "menu",
    "header",
    "breadcrumb",
    "skip",
    // Sidebars and secondary panels
    "sidebar",
    "aside",
    "related",
    // Footers and banners
    "footer",
    "banner",
    // Cookie, legal and accessibility notices
    "cookie",
    "consent",
    "disclaimer",
    "notice",
    "privacy",
    "alert",
    "accessibility",
    // Social and subscriptions
    "social",
    "share",
    "subscribe",
    "newsletter",
    // Feedback and overlays
    "feedback",
    "modal",
    "popup",
    // Directory listing chrome
    "search",
    "contact",
    "foia",
    "policies",
    "identifier",
];

/// Whether a response is a downloadable dataset
///
/// The media type is compared case-insensitively with parameters stripped. A
/// missing type or a generic `application/octet-stream` defers to the URL
/// extension.
pub fn is_downloadable(content_type: Option<&str>, url: &str) -> bool {
    let media_type = content_type
        .and_then(|value| value.split(';').next())
        .map(|value| value.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match media_type.as_str() {
        "" | "application/octet-stream" => has_dataset_extension(url),
        known => DATASET_MIME_TYPES.contains(&known),
    }
}

/// Whether the URL path ends in a geospatial file extension
pub fn has_dataset_extension(url: &str) -> bool {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };
    let file = path.rsplit('/').next().unwrap_or_default();
    match file.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            let ext = ext.to_ascii_lowercase();
            DATASET_EXTENSIONS.contains(&ext.as_str())
        }
        _ => false,
    }
}

/// Whether an element's class, id or role marks it as page chrome
pub fn is_boilerplate(element: &Element) -> bool {
    ["class", "id", "role"]
        .into_iter()
        .filter_map(|name| element.attr(name))
        .any(|value| {
            let value = value.to_ascii_lowercase();
            BOILERPLATE_MARKERS.iter().any(|marker| value.contains(marker))
        })
}
