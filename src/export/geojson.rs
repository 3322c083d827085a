//! GeoJSON（RFC 7946）形式。座標は [経度, 緯度] の順。

use super::VisibleTree;
use serde_json::{json, Value};

pub fn feature_collection(trees: &[VisibleTree<'_>]) -> Value {
    let features: Vec<Value> = trees.iter().map(feature).collect();
    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}

fn feature(tree: &VisibleTree<'_>) -> Value {
    json!({
        "type": "Feature",
        "id": tree.id,
        "geometry": {
            "type": "Point",
            "coordinates": [tree.lon, tree.lat],
        },
        "properties": {
            "category": tree.category,
            "representation": tree.representation,
            "name": tree.popup.name,
            "botanicalName": tree.popup.botanical_name,
            "image": tree.popup.image,
            "link": tree.popup.link,
        },
    })
}
