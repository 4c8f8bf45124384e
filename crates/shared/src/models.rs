use serde::{Deserialize, Serialize};

/// The only sensor this page searches.
pub const SENSOR_NAME: &str = "RadarSat-2";

pub const SEARCH_PATH: &str = "/search";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AoiMode {
    #[default]
    Country,
    Custom,
}

impl AoiMode {
    /// Radio-button value for this mode.
    pub fn as_str(self) -> &'static str {
        match self {
            AoiMode::Country => "country",
            AoiMode::Custom => "custom",
        }
    }

    /// Mode for a radio-button value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "country" => Some(AoiMode::Country),
            "custom" => Some(AoiMode::Custom),
            _ => None,
        }
    }
}

/// A GeoJSON position: `[lng, lat]`, extra ordinates (altitude) are kept but unused.
pub type Position = Vec<f64>;

/// GeoJSON geometry object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GeometryRepr", into = "GeometryRepr")]
pub enum Geometry {
    Point(Position),
    MultiPoint(Vec<Position>),
    LineString(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    /// Visit every position of the geometry.
    pub fn positions(&self) -> Box<dyn Iterator<Item = &Position> + '_> {
        match self {
            Geometry::Point(p) => Box::new(std::iter::once(p)),
            Geometry::MultiPoint(ps) | Geometry::LineString(ps) => Box::new(ps.iter()),
            Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
                Box::new(lines.iter().flatten())
            }
            Geometry::MultiPolygon(polys) => Box::new(polys.iter().flatten().flatten()),
            Geometry::GeometryCollection(members) => {
                Box::new(members.iter().flat_map(|g| g.positions()))
            }
        }
    }
}

/// Wire form of [`Geometry`]: collections carry `geometries`, everything
/// else carries `coordinates`.
#[derive(Serialize, Deserialize)]
#[serde(tag = "type")]
enum GeometryRepr {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
    GeometryCollection { geometries: Vec<Geometry> },
}

impl From<GeometryRepr> for Geometry {
    fn from(repr: GeometryRepr) -> Self {
        match repr {
            GeometryRepr::Point { coordinates } => Geometry::Point(coordinates),
            GeometryRepr::MultiPoint { coordinates } => Geometry::MultiPoint(coordinates),
            GeometryRepr::LineString { coordinates } => Geometry::LineString(coordinates),
            GeometryRepr::MultiLineString { coordinates } => Geometry::MultiLineString(coordinates),
            GeometryRepr::Polygon { coordinates } => Geometry::Polygon(coordinates),
            GeometryRepr::MultiPolygon { coordinates } => Geometry::MultiPolygon(coordinates),
            GeometryRepr::GeometryCollection { geometries } => {
                Geometry::GeometryCollection(geometries)
            }
        }
    }
}

impl From<Geometry> for GeometryRepr {
    fn from(geometry: Geometry) -> Self {
        match geometry {
            Geometry::Point(coordinates) => GeometryRepr::Point { coordinates },
            Geometry::MultiPoint(coordinates) => GeometryRepr::MultiPoint { coordinates },
            Geometry::LineString(coordinates) => GeometryRepr::LineString { coordinates },
            Geometry::MultiLineString(coordinates) => GeometryRepr::MultiLineString { coordinates },
            Geometry::Polygon(coordinates) => GeometryRepr::Polygon { coordinates },
            Geometry::MultiPolygon(coordinates) => GeometryRepr::MultiPolygon { coordinates },
            Geometry::GeometryCollection(geometries) => {
                GeometryRepr::GeometryCollection { geometries }
            }
        }
    }
}

/// Body of `POST /search`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub username: String,
    pub password: String,
    pub startdate: String,
    pub enddate: String,
    pub sensorname: String,
    pub aoi_mode: AoiMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aoi_geojson: Option<Geometry>,
}

/// GeoJSON allows string or numeric feature ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Text(String),
    Number(serde_json::Number),
}

impl FeatureId {
    /// Empty strings count as a missing id, as does numeric zero.
    pub fn is_blank(&self) -> bool {
        match self {
            FeatureId::Text(s) => s.is_empty(),
            FeatureId::Number(n) => n.as_f64() == Some(0.0),
        }
    }
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureId::Text(s) => f.write_str(s),
            FeatureId::Number(n) => f.write_str(&display_number(n)),
        }
    }
}

/// Shortest decimal form of a JSON number; integral floats lose the `.0`.
pub fn display_number(n: &serde_json::Number) -> String {
    match n.as_f64() {
        Some(v) if n.is_f64() => format!("{}", v),
        _ => n.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Download {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub productname: Option<String>,
}

/// Properties of a result feature.
///
/// The scalar members are kept as raw JSON since backends disagree on their
/// types (`"resolution": "3"` as well as `3`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureProperties {
    #[serde(default)]
    pub acquired: serde_json::Value,
    #[serde(default)]
    pub sensorname: serde_json::Value,
    #[serde(default)]
    pub resolution: serde_json::Value,
    #[serde(default, deserialize_with = "lenient_downloads")]
    pub downloads: Option<Vec<Option<Download>>>,
}

/// A `downloads` value that is not an array is treated as absent.
fn lenient_downloads<'de, D>(deserializer: D) -> Result<Option<Vec<Option<Download>>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Array(items) => Ok(Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value(item).ok())
                .collect(),
        )),
        _ => Ok(None),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<FeatureId>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default, deserialize_with = "lenient_properties")]
    pub properties: FeatureProperties,
}

impl Feature {
    /// Decode one member of a collection's `features` array.
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

/// Ids that are neither strings nor numbers count as missing.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<FeatureId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(FeatureId::Text(s)),
        serde_json::Value::Number(n) => Some(FeatureId::Number(n)),
        _ => None,
    })
}

/// `null` or non-object properties read as empty.
fn lenient_properties<'de, D>(deserializer: D) -> Result<FeatureProperties, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Successful `/search` body. Features stay raw so one malformed member
/// cannot spoil the rest.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default, deserialize_with = "lenient_features")]
    pub features: Vec<serde_json::Value>,
}

/// A `features` value that is not an array holds no features.
fn lenient_features<'de, D>(deserializer: D) -> Result<Vec<serde_json::Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(items) => Ok(items),
        _ => Ok(Vec::new()),
    }
}

/// Body returned with a non-2xx status.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}
