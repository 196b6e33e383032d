use crate::cluster::DensityCluster;
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, JsonObject, JsonValue, Value};

fn cluster_to_feature(cluster: &DensityCluster, resolution: f64) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("count".to_string(), JsonValue::from(cluster.count));
    properties.insert(
        "cell_id".to_string(),
        JsonValue::from(cluster.key.to_identifier(resolution)),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            cluster.longitude,
            cluster.latitude,
        ]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Serializes clusters as a GeoJSON FeatureCollection of points.
///
/// Each feature carries the cluster `count` and its `cell_id`; coordinates are
/// `[longitude, latitude]` as GeoJSON requires.
pub fn clusters_to_geojson(clusters: &[DensityCluster], resolution: f64) -> String {
    let collection = FeatureCollection {
        bbox: None,
        features: clusters
            .iter()
            .map(|c| cluster_to_feature(c, resolution))
            .collect(),
        foreign_members: None,
    };
    GeoJson::from(collection).to_string()
}
