//! Render map documents as a standalone HTML page driven by Leaflet
use super::MapRenderingService;
use crate::gps::Location;
use crate::map::{Bounds, FeatureGroup, Map, Marker, PolyLine};
use crate::popup::escape_html;
use crate::Error;
use serde::Serialize;

/// Defines the scripts, stylesheets and tile source used by the generated page
#[derive(Clone, Debug)]
pub struct Leaflet {
    leaflet_js: String,
    leaflet_css: String,
    awesome_markers_js: String,
    awesome_markers_css: String,
    glyphicons_css: String,
    tiles_name: String,
    tiles_url: String,
    tiles_attribution: String,
    max_zoom: u8,
}

impl Leaflet {
    fn head(&self) -> String {
        format!(
            r#"<head>
    <meta http-equiv="content-type" content="text/html; charset=UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1.0, maximum-scale=1.0, user-scalable=no" />
    <script src="{}"></script>
    <script src="{}"></script>
    <link rel="stylesheet" href="{}"/>
    <link rel="stylesheet" href="{}"/>
    <link rel="stylesheet" href="{}"/>
    <style>
        html, body {{ width: 100%; height: 100%; margin: 0; padding: 0; }}
        #map {{ position: absolute; top: 0; bottom: 0; right: 0; left: 0; }}
    </style>
</head>"#,
            self.leaflet_js,
            self.awesome_markers_js,
            self.leaflet_css,
            self.awesome_markers_css,
            self.glyphicons_css,
        )
    }

    fn script(&self, map: &Map) -> Result<String, Error> {
        let mut script = format!(
            "var map = L.map(\"map\", {});\n",
            js_value(&MapOptions {
                center: coordinates(&map.center()),
                zoom: map.zoom(),
            })?
        );
        script += &format!(
            "var tiles = L.tileLayer({}, {}).addTo(map);\n",
            js_value(&self.tiles_url)?,
            js_value(&TileOptions {
                attribution: &self.tiles_attribution,
                max_zoom: self.max_zoom,
            })?
        );

        let mut overlays = Vec::new();
        for (idx, group) in map.groups().iter().enumerate() {
            let name = format!("layer_{}", idx);
            script += &feature_group_script(&name, group)?;
            overlays.push(format!("{}: {}", js_value(&escape_html(group.name()))?, name));
        }

        if let Some(control) = map.layer_control() {
            script += &format!(
                "L.control.layers({{{}: tiles}}, {{{}}}, {}).addTo(map);\n",
                js_value(&self.tiles_name)?,
                overlays.join(", "),
                js_value(&LayerControlOptions {
                    collapsed: control.collapsed
                })?
            );
        }
        if let Some(bounds) = map.fitted_bounds() {
            script += &format!("map.fitBounds({});\n", js_value(&bounds_array(&bounds))?);
        }

        Ok(script)
    }
}

impl Default for Leaflet {
    fn default() -> Self {
        Leaflet {
            leaflet_js: "https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.js".to_string(),
            leaflet_css: "https://cdn.jsdelivr.net/npm/leaflet@1.9.4/dist/leaflet.css".to_string(),
            awesome_markers_js: "https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.js".to_string(),
            awesome_markers_css: "https://cdnjs.cloudflare.com/ajax/libs/Leaflet.awesome-markers/2.0.2/leaflet.awesome-markers.css".to_string(),
            glyphicons_css: "https://netdna.bootstrapcdn.com/bootstrap/3.0.0/css/bootstrap-glyphicons.css".to_string(),
            tiles_name: "openstreetmap".to_string(),
            tiles_url: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            tiles_attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".to_string(),
            max_zoom: 19,
        }
    }
}

impl MapRenderingService for Leaflet {
    fn render_map(&self, map: &Map) -> Result<String, Error> {
        Ok(format!(
            "<!DOCTYPE html>\n<html>\n{}\n<body>\n<div id=\"map\"></div>\n{}\n<script>\n{}</script>\n</body>\n</html>\n",
            self.head(),
            map.overlays().join("\n"),
            self.script(map)?
        ))
    }
}

#[derive(Serialize)]
struct MapOptions {
    center: [f64; 2],
    zoom: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TileOptions<'a> {
    attribution: &'a str,
    max_zoom: u8,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IconOptions<'a> {
    icon: &'a str,
    icon_color: &'a str,
    marker_color: &'a str,
    prefix: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PopupOptions {
    max_width: u32,
}

#[derive(Serialize)]
struct PolyLineOptions<'a> {
    color: &'a str,
    weight: u32,
    opacity: f32,
}

#[derive(Serialize)]
struct TooltipOptions {
    sticky: bool,
}

#[derive(Serialize)]
struct LayerControlOptions {
    collapsed: bool,
}

fn feature_group_script(name: &str, group: &FeatureGroup) -> Result<String, Error> {
    let mut script = format!("var {} = L.featureGroup().addTo(map);\n", name);
    for (idx, marker) in group.markers().iter().enumerate() {
        script += &marker_script(&format!("{}_marker_{}", name, idx), name, marker)?;
    }
    for (idx, line) in group.lines().iter().enumerate() {
        script += &line_script(&format!("{}_line_{}", name, idx), name, line)?;
    }
    Ok(script)
}

fn marker_script(name: &str, parent: &str, marker: &Marker) -> Result<String, Error> {
    let mut script = format!(
        "var {} = L.marker({}).addTo({});\n",
        name,
        js_value(&coordinates(&marker.location))?,
        parent
    );
    script += &format!(
        "{}.setIcon(L.AwesomeMarkers.icon({}));\n",
        name,
        js_value(&IconOptions {
            icon: &marker.icon.icon,
            icon_color: &marker.icon.icon_color,
            marker_color: &marker.icon.color,
            prefix: "glyphicon",
        })?
    );
    if let Some(popup) = &marker.popup {
        script += &format!(
            "{}.bindPopup(L.popup({}).setContent({}));\n",
            name,
            js_value(&PopupOptions {
                max_width: popup.max_width
            })?,
            js_value(&popup.html)?
        );
    }
    Ok(script)
}

fn line_script(name: &str, parent: &str, line: &PolyLine) -> Result<String, Error> {
    let points: Vec<[f64; 2]> = line.locations.iter().map(coordinates).collect();
    let mut script = format!(
        "var {} = L.polyline({}, {}).addTo({});\n",
        name,
        js_value(&points)?,
        js_value(&PolyLineOptions {
            color: &line.color,
            weight: line.weight,
            opacity: line.opacity,
        })?,
        parent
    );
    if let Some(tooltip) = &line.tooltip {
        script += &format!(
            "{}.bindTooltip({}, {});\n",
            name,
            js_value(&format!("<div>{}</div>", escape_html(tooltip)))?,
            js_value(&TooltipOptions { sticky: true })?
        );
    }
    Ok(script)
}

fn coordinates(loc: &Location) -> [f64; 2] {
    [loc.latitude(), loc.longitude()]
}

fn bounds_array(bounds: &Bounds) -> [[f64; 2]; 2] {
    [[bounds.south, bounds.west], [bounds.north, bounds.east]]
}

/// Serialize a value as a JavaScript literal that is safe to embed inside a script element
fn js_value<T: Serialize + ?Sized>(value: &T) -> Result<String, Error> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{FeatureGroup, Icon, LayerControl, Popup};

    fn sample_map() -> Map {
        let mut map = Map::default();
        let id = map.add_group(FeatureGroup::new("📂 hike".to_string()));
        let group = map.group_mut(id).unwrap();
        group.add_marker(Marker {
            location: Location::new(45.0, 10.0),
            icon: Icon::info("green"),
            popup: Some(Popup {
                html: "<h4>Ridge Walk</h4><script>alert(1)</script>".to_string(),
                max_width: 300,
            }),
        });
        group.add_line(PolyLine {
            locations: vec![Location::new(45.0, 10.0), Location::new(45.5, 10.25)],
            color: "green".to_string(),
            weight: 4,
            opacity: 0.7,
            tooltip: Some("Ridge <Walk>".to_string()),
        });
        map.set_layer_control(LayerControl { collapsed: false });
        map
    }

    #[test]
    fn test_render_groups_and_controls() {
        let mut map = sample_map();
        let bounds = map.bounds().unwrap();
        map.fit_bounds(bounds);
        map.add_overlay("<div id=\"legend\">LEGENDA</div>".to_string());
        let html = Leaflet::default().render_map(&map).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("var map = L.map(\"map\", {\"center\":[45.5,10.5],\"zoom\":7});"));
        assert!(html.contains("var layer_0 = L.featureGroup().addTo(map);"));
        assert!(html.contains("var layer_0_marker_0 = L.marker([45.0,10.0]).addTo(layer_0);"));
        assert!(html.contains("\"markerColor\":\"green\""));
        assert!(html.contains("\"icon\":\"info-sign\""));
        assert!(html.contains("L.popup({\"maxWidth\":300})"));
        assert!(html.contains(
            "L.polyline([[45.0,10.0],[45.5,10.25]], {\"color\":\"green\",\"weight\":4,\"opacity\":0.7}).addTo(layer_0);"
        ));
        assert!(html.contains("Ridge &lt;Walk&gt;"));
        assert!(html.contains("L.control.layers({\"openstreetmap\": tiles}, {\"📂 hike\": layer_0}, {\"collapsed\":false})"));
        assert!(html.contains("map.fitBounds([[45.0,10.0],[45.5,10.25]]);"));
        assert!(html.contains("<div id=\"legend\">LEGENDA</div>"));
    }

    #[test]
    fn test_script_content_cannot_close_script_element() {
        let html = Leaflet::default().render_map(&sample_map()).unwrap();
        assert_eq!(html.matches("</script>").count(), 3);
        assert!(html.contains("alert(1)<\\/script>"));
    }

    #[test]
    fn test_empty_map_keeps_initial_viewport() {
        let html = Leaflet::default().render_map(&Map::default()).unwrap();
        assert!(html.contains("\"center\":[45.5,10.5]"));
        assert!(!html.contains("fitBounds"));
        assert!(!html.contains("L.featureGroup"));
        assert!(!html.contains("L.control.layers"));
    }

    #[test]
    fn test_layer_names_are_escaped() {
        let mut map = Map::default();
        map.add_group(FeatureGroup::new("📂 <b>ski</b> & snow".to_string()));
        map.set_layer_control(LayerControl { collapsed: false });
        let html = Leaflet::default().render_map(&map).unwrap();
        assert!(html.contains("{\"📂 &lt;b&gt;ski&lt;/b&gt; &amp; snow\": layer_0}"));
        assert!(!html.contains("<b>ski"));
    }
}
