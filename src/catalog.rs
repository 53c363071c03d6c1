//! Static catalog of public geospatial data portals.
//!
//! The catalog is embedded on the first run to build the embedding cache. Each
//! entry pairs a portal URL with a short human-written description that the
//! embedding service turns into the vector used for seed ranking.

/// A catalog entry: portal URL and its description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Portal URL used as a crawl seed
    pub url: &'static str,

    /// Description embedded for relevance ranking
    pub description: &'static str,
}

const fn entry(url: &'static str, description: &'static str) -> CatalogEntry {
    CatalogEntry { url, description }
}

/// Public geospatial data portals known before any crawl has run.
pub static SEED_CATALOG: &[CatalogEntry] = &[
    // National Data Sources (US)
    entry(
        "https://prd-tnm.s3.amazonaws.com/index.html?prefix=StagedProducts/",
        "USGS The National Map – browsable S3 bucket for staged elevation, hydrography, imagery, and land-cover files.",
    ),
    entry(
        "https://rockyweb.usgs.gov/vdelivery/Datasets/Staged/Elevation/",
        "USGS Elevation delivery directory (1 m & 10 m DEM GeoTIFFs).",
    ),
    entry(
        "https://www.mrlc.gov/viewer/",
        "MRLC NLCD tile viewer & bulk download tool.",
    ),
    entry(
        "https://coast.noaa.gov/htdata/",
        "NOAA Digital Coast ‘htdata’ directory with LiDAR, shoreline, and coastal imagery datasets.",
    ),
    entry(
        "https://www.ncei.noaa.gov/data/",
        "NOAA NCEI bulk data access root for climate, ocean, and geophysical archives.",
    ),
    entry(
        "https://nassgeodata.gmu.edu/CropScape/",
        "USDA CropScape interface for Cropland Data Layer raster downloads.",
    ),
    entry(
        "https://www.nrcs.usda.gov/resources/data-and-reports/ssurgo",
        "NRCS SSURGO detailed soil survey database downloads.",
    ),
    entry(
        "https://www2.census.gov/geo/tiger/",
        "Census TIGER/Line FTP site for boundaries, roads, and address ranges (shapefiles).",
    ),
    entry(
        "https://portal.opentopography.org/datasets",
        "OpenTopography catalogue of LiDAR point clouds and derived DEMs.",
    ),
    entry(
        "https://catalog.data.gov/dataset/?metadata_type=geospatial",
        "Data.gov geospatial catalog – U.S. government open datasets.",
    ),
    entry(
        "https://www.usgs.gov/core-science-systems/ngp/tnm-services",
        "USGS ‘The National Map’ services and downloads.",
    ),
    entry(
        "https://earthexplorer.usgs.gov/",
        "USGS EarthExplorer – satellite, aerial, cartographic data (login for large downloads).",
    ),
    entry(
        "https://lpdaac.usgs.gov/",
        "NASA LP DAAC – land-processes satellite products.",
    ),
    entry(
        "https://www.ncei.noaa.gov/products",
        "NOAA NCEI product landing page (climate, ocean, environmental).",
    ),
    entry(
        "https://nowcoast.noaa.gov/",
        "NOAA nowCOAST real-time coastal observations & forecasts (web services).",
    ),
    entry(
        "https://www.weather.gov/gis/",
        "National Weather Service GIS shapefiles & web services.",
    ),
    entry(
        "https://geodata.epa.gov/",
        "EPA GeoData portal – environmental layers.",
    ),
    entry(
        "https://datagateway.nrcs.usda.gov/",
        "USDA Geospatial Data Gateway – soils, agriculture, conservation.",
    ),
    entry(
        "https://www.fs.usda.gov/geodata/",
        "U.S. Forest Service Geodata Clearinghouse.",
    ),
    entry(
        "https://www.mrlc.gov/",
        "MRLC – NLCD U.S. land-cover products.",
    ),
    entry(
        "https://www.fws.gov/program/national-wetlands-inventory/data",
        "U.S. Fish & Wildlife Service – National Wetlands Inventory.",
    ),
    entry(
        "https://www.census.gov/geographies/mapping-files.html",
        "Census mapping files page – TIGER/Line, cartographic boundaries.",
    ),
    entry(
        "https://www.bts.gov/mapping",
        "Bureau of Transportation Statistics open mapping data.",
    ),
    entry(
        "https://nationalmap.gov/elevation.html",
        "USGS National Elevation Dataset info & links.",
    ),
    entry(
        "https://hydro.nationalmap.gov/arcgis/rest/services/nhd/MapServer",
        "USGS National Hydrography Dataset (ArcGIS REST).",
    ),
    entry(
        "https://catalog.data.gov/dataset?q=lidar",
        "Data.gov LiDAR search results.",
    ),
    entry(
        "https://coast.noaa.gov/dataviewer/#/lidar/search/",
        "NOAA Digital Coast interactive LiDAR search & download.",
    ),
    entry(
        "https://www.usgs.gov/programs/earthquake-hazards/data",
        "USGS Earthquake Hazards Program datasets.",
    ),
    entry(
        "https://geonarrative.usgs.gov/datagateway/data/shapefiles/",
        "USGS historical topo quadrangles & other shapefiles.",
    ),
    entry(
        "https://www.dot.gov/data",
        "U.S. Department of Transportation open-data portal.",
    ),
    // Global Data Sources
    entry(
        "https://www.openstreetmap.org/data",
        "OpenStreetMap planet dumps and extracts.",
    ),
    entry(
        "https://download.geofabrik.de/",
        "Geofabrik regional OSM PBF/shape extracts.",
    ),
    entry(
        "https://www.naturalearthdata.com/downloads/",
        "Natural Earth vector & raster small-scale datasets.",
    ),
    entry(
        "https://scihub.copernicus.eu/",
        "Copernicus Open Access Hub – Sentinel imagery (registration).",
    ),
    entry(
        "https://www.gebco.net/data_and_products/gridded_bathymetry_data/",
        "GEBCO global ocean bathymetry grids.",
    ),
    entry(
        "http://www.diva-gis.org/gdata",
        "DIVA-GIS free GIS country layers (boundaries, roads, rivers, elevation).",
    ),
    entry(
        "https://sedac.ciesin.columbia.edu/data/sets/browse",
        "NASA SEDAC socioeconomic & environmental raster/vector data.",
    ),
    entry(
        "https://search.earthdata.nasa.gov/",
        "NASA Earthdata Search – multi-mission satellite catalog (login for download).",
    ),
    entry(
        "https://lta.cr.usgs.gov/GLCC",
        "USGS Global Land Cover Characterization (GLCC).",
    ),
    entry(
        "https://www.pancgaea.org/",
        "PANGAEA repository for earth & environmental science datasets.",
    ),
    entry(
        "https://earthengine.google.com/datasets/",
        "Google Earth Engine public data catalog.",
    ),
    entry(
        "https://registry.opendata.aws/",
        "AWS Open Data Registry – S3-hosted geospatial datasets.",
    ),
    entry(
        "https://open-data.europa.eu/en/data?q=geospatial",
        "EU Open Data Portal – search geospatial datasets.",
    ),
    entry(
        "https://www.un-spider.org/links/data-providers",
        "UN-SPIDER list of satellite and disaster-response data providers.",
    ),
    entry(
        "https://gpm.nasa.gov/data/directory",
        "NASA GPM precipitation products.",
    ),
    entry(
        "https://firms.modaps.eosdis.nasa.gov/",
        "NASA FIRMS – active fire / hotspot data.",
    ),
    entry(
        "https://ghrc.nsstc.nasa.gov/home/data",
        "NASA GHRC – precipitation & severe-weather satellite data.",
    ),
    entry(
        "https://nsidc.org/data",
        "NSIDC cryosphere data (snow, ice, glaciers).",
    ),
    entry(
        "https://www.unep.org/explore-topics/environmental-data-and-assessment",
        "UN Environment Programme open environmental datasets.",
    ),
    entry(
        "https://data.mendeley.com/datasets/tag/geospatial",
        "Mendeley Data repository – datasets tagged ‘geospatial’.",
    ),
    entry(
        "https://ourworldindata.org/grapher/data-downloads",
        "Our World in Data bulk CSV/ZIP downloads (many with geospatial attributes).",
    ),
    entry(
        "https://www.worldpop.org/geodata",
        "WorldPop high-resolution gridded population layers.",
    ),
    entry(
        "https://www.ncei.noaa.gov/maps/historical_weather/",
        "NOAA NCEI historical weather map images (GeoTIFF/PNG).",
    ),
    // Thematic / Specialty Data Sources
    entry(
        "https://hydrosheds.org/products",
        "HydroSHEDS global hydrological basins & river networks.",
    ),
    entry(
        "https://worldclim.org/data/index.html",
        "WorldClim high-resolution climate normals & scenarios.",
    ),
    entry(
        "https://www.isric.org/explore/soilgrids",
        "ISRIC SoilGrids – global gridded soil properties.",
    ),
    entry(
        "https://www.onegeology.org/data.html",
        "OneGeology worldwide geologic map services & downloads.",
    ),
    entry(
        "https://www.obis.org/",
        "OBIS – global marine species occurrence records.",
    ),
    entry(
        "https://www.movebank.org/cms/movebank-main",
        "Movebank animal movement (GPS tracking) data.",
    ),
    entry(
        "https://www.gbif.org/data",
        "GBIF – global biodiversity occurrence datasets.",
    ),
    entry(
        "https://gadm.org/data.html",
        "GADM detailed global administrative boundaries.",
    ),
    entry(
        "https://data.humdata.org/",
        "Humanitarian Data Exchange (HDX) – crisis & development datasets.",
    ),
    entry(
        "https://geoportal.kogis.or.kr/eng/index.do",
        "Korea NSDI GeoPortal – national spatial data (example international).",
    ),
    entry(
        "https://www.jpl.nasa.gov/earth/earth-science-data/",
        "NASA JPL Earth-science specialty datasets.",
    ),
    entry(
        "https://data.openstreetmap.la/",
        "OpenStreetMap Latin America extracts.",
    ),
    entry(
        "https://land.copernicus.eu/global/products/gdd",
        "Copernicus Global Land Service datasets.",
    ),
    entry(
        "https://climatedata.wri.org/",
        "World Resources Institute climate indicators.",
    ),
    entry(
        "https://datacatalog.worldbank.org/search/type/dataset?sort_by=field_geo_coverage&sort_order=ASC",
        "World Bank Data Catalog – geospatial filter.",
    ),
    entry(
        "https://www.fao.org/geospatial/resources/data/en/",
        "FAO GeoNetwork global agriculture & land-use layers.",
    ),
    entry(
        "https://maps.ngdc.noaa.gov/viewers/bathymetry/",
        "NOAA NGDC global bathymetry viewer & downloads.",
    ),
    entry(
        "https://marinecadastre.gov/data/",
        "U.S. Marine Cadastre – ocean planning GIS layers.",
    ),
    entry(
        "https://www.nrcan.gc.ca/maps-tools-publications/geoscientific-data/17799",
        "Natural Resources Canada national geoscience datasets.",
    ),
    entry(
        "https://www.statistikportal.de/de/daten/geodaten",
        "Destatis (Germany) geospatial statistics downloads.",
    ),
    entry(
        "https://www.ign.es/web/ign/portal/ide-ign",
        "Spanish National Geographic Institute open data.",
    ),
    entry(
        "https://www.data.gouv.fr/fr/datasets/?q=geospatial",
        "French government open-data portal – geospatial search.",
    ),
    entry(
        "https://www.data.wa.gov/data-categories/geospatial",
        "Washington State open geospatial data portal.",
    ),
    entry(
        "https://opendata.arcgis.com/",
        "ArcGIS Hub global open-data endpoint (search thousands of orgs).",
    ),
    entry(
        "https://www.geopunt.be/en/data/open-data",
        "Flanders (Belgium) GeoPunt open geospatial data.",
    ),
    entry(
        "https://geodata.lib.berkeley.edu/",
        "UC Berkeley Library geospatial data repository.",
    ),
    entry(
        "https://www.caris.com/data/",
        "CARIS sample hydrographic datasets.",
    ),
    entry(
        "https://digitalglobe.com/open-data/",
        "Maxar DigitalGlobe Open Data (disaster imagery).",
    ),
    entry(
        "https://www.planet.com/open-data/",
        "Planet Labs Open Data Program (disaster/event imagery).",
    ),
    entry(
        "https://www.esa.int/ESA_Multimedia/Images",
        "ESA Earth Online imagery & data links.",
    ),
    entry(
        "https://www.copernicus.eu/en/access-data/copernicus-data-access",
        "Copernicus consolidated data-access page.",
    ),
    entry(
        "https://www.ncei.noaa.gov/metadata/geoportal/rest/rpc/search/",
        "NOAA NCEI GeoPortal REST search (machine-friendly).",
    ),
    entry(
        "https://earthquake.usgs.gov/earthquakes/feed/v1.0/geojson.php",
        "USGS real-time earthquake GeoJSON feed.",
    ),
    entry(
        "https://www.un-sp.org/gis-open-data",
        "United Nations spatial open-data hub.",
    ),
    entry(
        "https://ghgdata.epa.gov/ghgp/main.do",
        "EPA Greenhouse Gas Reporting downloadable datasets.",
    ),
    entry(
        "https://www.data.gouv.fr/fr/datasets/r/d060c5a1-77e4-4d80-bc4f-4d43615b67d5",
        "Direct French urban-area shapefile download example.",
    ),
    entry(
        "https://www.ngdc.noaa.gov/thredds/catalog.html",
        "NOAA NCEI THREDDS scientific data server.",
    ),
    entry(
        "https://registry.opendata.aws/tag/geospatial/",
        "AWS Open Data sets tagged ‘geospatial’.",
    ),
    entry(
        "https://s3-us-west-2.amazonaws.com/elevation-tiles-prod/tiles/9/152/207.terrain.mapbox",
        "Sample Mapbox Terrain-RGB tile (pattern for all DEM tiles).",
    ),
    entry(
        "https://assets.publishing.service.gov.uk/government/uploads/system/uploads/attachment_data/file/762512/Local_Authority_Districts__December_2018__Boundaries_UK_BFC.zip",
        "UK Local Authority boundary shapefile (direct ZIP).",
    ),
    entry(
        "https://geofabric.s3.amazonaws.com/updates/2024-07-07/europe/germany-latest.osm.pbf",
        "Geofabrik daily OSM PBF extract (Germany) – direct S3 link.",
    ),
    entry(
        "https://opendata.arcgis.com/datasets/counties.zip",
        "ArcGIS Hub example direct ZIP – U.S. counties shapefile.",
    ),
    entry(
        "https://www.hydro.washington.edu/data/grdc/hydro_data/GRDC_Monthly_Summary_Files.zip",
        "GRDC monthly river-discharge summaries (ZIP).",
    ),
    entry(
        "https://www.epa.gov/sites/default/files/2015-12/documents/us_epa_facilities_20151218.zip",
        "EPA facilities geodata (direct ZIP download).",
    ),
    entry(
        "https://data.europa.eu/euodp/data/dataset/eu-nuts-regions-2021",
        "EU NUTS administrative regions shapefile & GeoPackage.",
    ),
    entry(
        "https://www.istat.it/it/archivio/104317",
        "ISTAT (Italy) official boundary datasets.",
    ),
    entry(
        "https://geodata.statoil.com/",
        "Equinor (Statoil) energy-sector open geodata.",
    ),
    entry(
        "https://data.linz.govt.nz/",
        "Land Information New Zealand national datasets.",
    ),
    entry(
        "https://www.bgs.ac.uk/data-and-resources/",
        "British Geological Survey downloadable data & maps.",
    ),
    entry(
        "https://data.nasa.gov/",
        "NASA open-data portal with geospatial datasets.",
    ),
    entry(
        "https://www.eumetsat.int/data",
        "EUMETSAT meteorological satellite data centre.",
    ),
    entry(
        "https://www.dwd.de/DE/leistungen/opendata/opendata_node.html",
        "German Weather Service (DWD) open data catalogue.",
    ),
    entry(
        "https://www.jrc.ec.europa.eu/en/data",
        "European Commission Joint Research Centre datasets.",
    ),
    entry(
        "https://www.eea.europa.eu/data-and-maps",
        "European Environment Agency data & maps portal.",
    ),
    entry(
        "https://data.un.org/",
        "United Nations open statistics portal (some spatial).",
    ),
    entry(
        "https://www.istat.it/it/archivio/267860",
        "ISTAT (Italy) socio-economic geodata.",
    ),
    entry(
        "https://www.data.go.jp/data/jp_go_opendata_catalogue_dataset/?q=geospatial",
        "Japan Government open-data (search ‘geospatial’).",
    ),
    entry(
        "https://geodata.bund.de/web/guest/start",
        "Germany’s National Spatial Data Infrastructure (GDI-DE) portal.",
    ),
    entry(
        "https://www.esri.com/en-us/arcgis/products/data/open-data",
        "Esri curated list of open data portals worldwide.",
    ),
    entry(
        "https://data.cityofnewyork.us/browse?q=geospatial&sortBy=relevance",
        "NYC Open Data – geospatial filter.",
    ),
    entry(
        "https://www.chgis.org/data/geodatabase/",
        "China Historical GIS geodatabases.",
    ),
    entry(
        "https://www.cegis.dk/geodata-downloads/",
        "Danish Centre for Environment & Geoscience geodata.",
    ),
    entry(
        "https://geoportal.cuzk.cz/geoportal/eng/default.aspx",
        "Czech national mapping authority GeoPortal.",
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_urls_are_unique() {
        let unique: HashSet<_> = SEED_CATALOG.iter().map(|e| e.url).collect();
        assert_eq!(unique.len(), SEED_CATALOG.len());
    }

    #[test]
    fn test_catalog_entries_are_valid() {
        for entry in SEED_CATALOG {
            assert!(url::Url::parse(entry.url).is_ok(), "bad url {}", entry.url);
            assert!(!entry.description.trim().is_empty());
        }
    }
}
