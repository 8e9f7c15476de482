//! Canned feed responses shared by tests.

/// Three well-formed features with magnitudes 4.2, 6.8, 2.1.
pub(crate) const SAMPLE: &str = r#"{
    "type": "FeatureCollection",
    "metadata": {"count": 3},
    "features": [
        {"type": "Feature", "properties": {"mag": 4.2, "place": "5km NW of Reno, NV", "time": 1700000000000, "url": "https://earthquake.usgs.gov/earthquakes/eventpage/a1", "tsunami": 0}, "id": "a1"},
        {"type": "Feature", "properties": {"mag": 6.8, "place": "Fiji region", "time": 1700000100000, "url": "https://earthquake.usgs.gov/earthquakes/eventpage/a2"}, "id": "a2"},
        {"type": "Feature", "properties": {"mag": 2.1, "place": "12 km S of Volcano, Hawaii", "time": 1700000200000, "url": "https://earthquake.usgs.gov/earthquakes/eventpage/a3"}, "id": "a3"}
    ]
}"#;
