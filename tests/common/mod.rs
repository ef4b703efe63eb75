//! A small on-disk dataset shared by the integration tests.
use std::fs;
use std::path::Path;

const STATES: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "properties": {"NAME": "California"},
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-124, 32], [-114, 32], [-114, 42], [-124, 42], [-124, 32]]]
      }
    },
    {
      "type": "Feature",
      "properties": {"NAME": "Texas"},
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-106, 26], [-94, 26], [-94, 36], [-106, 36], [-106, 26]]]
      }
    },
    {
      "type": "Feature",
      "properties": {"NAME": "Alaska"},
      "geometry": {
        "type": "MultiPolygon",
        "coordinates": [
          [[[-165, 55], [-141, 55], [-141, 70], [-165, 70], [-165, 55]]],
          [[[-176, 51], [-170, 51], [-170, 53], [-176, 51]]]
        ]
      }
    },
    {
      "type": "Feature",
      "properties": {"NAME": "Puerto Rico"},
      "geometry": {
        "type": "Polygon",
        "coordinates": [[[-67.3, 17.9], [-65.6, 17.9], [-65.6, 18.5], [-67.3, 17.9]]]
      }
    }
  ]
}"#;

/// Write a wide table with a title row, for the years 1999 and 2000
fn write_table(dir: &Path, name: &str, rows: &[(&str, &str, &str)]) {
    let mut contents = format!("{name}\nState,1999,2000\n");
    for (state, y1999, y2000) in rows {
        contents.push_str(&format!("{state},\"{y1999}\",\"{y2000}\"\n"));
    }
    fs::write(dir.join(name), contents).unwrap();
}

/// Write the geometry, all six energy tables and a `view.toml` to `dir`.
///
/// The view covers 1995 to 2000, but the tables only have data for the last two years.
///
/// California's renewable share of consumption in 2000 is 0.25 (50 of 200 billion Btu) and its
/// share of production is 0.3. Contrast stretching is turned off.
pub fn write_dataset(dir: &Path) {
    fs::write(dir.join("states.geojson"), STATES).unwrap();

    write_table(
        dir,
        "Total primary energy-Table 1.csv",
        &[("CA", "1,000", "1,000"), ("TX", "10,000", "12,000"), ("AK", "NA", "500")],
    );
    write_table(
        dir,
        "Total renewables-Table 1.csv",
        &[("CA", "250", "300"), ("TX", "100", "120"), ("AK", "NA", "25")],
    );
    write_table(
        dir,
        "CONSUMPTION Coal-Table 1.csv",
        &[("CA", "100", "100"), ("TX", "50", "50")],
    );
    write_table(
        dir,
        "CONSUMPTION Natural gas-Table 1.csv",
        &[("CA", "30", "30"), ("TX", "30", "30")],
    );
    write_table(
        dir,
        "CONSUMPTION Petroleum-Table 1.csv",
        &[("CA", "20", "20"), ("TX", "10", "10")],
    );
    write_table(
        dir,
        "CONSUMPTION Total renewable energy-Table 1.csv",
        &[("CA", "40", "50"), ("TX", "10", "10")],
    );

    fs::write(
        dir.join("view.toml"),
        "first_year = 1995\nlast_year = 2000\nstretch_consumption = false\n",
    )
    .unwrap();
}
