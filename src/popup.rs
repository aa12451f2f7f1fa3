//! Draw a single route: its start marker with an information popup and its track line
use crate::gps::Location;
use crate::map::{FeatureGroup, Icon, Marker, PolyLine, Popup};
use crate::routes::RouteRecord;
use crate::track::TrackSummary;

/// Stroke width of route lines in pixels
pub static LINE_WEIGHT: u32 = 4;

/// Opacity of route lines
pub static LINE_OPACITY: f32 = 0.7;

/// Maximum width of route popups in pixels
pub static POPUP_MAX_WIDTH: u32 = 300;

/// Build the popup content describing a route
pub fn popup_html(route: &RouteRecord, track: &TrackSummary, color: &str) -> String {
    let color = escape_html(color);
    format!(
        r#"<div style="font-family: Arial; width: 200px;">
    <h4 style="margin:0; color: {color}; border-bottom: 1px solid #ccc; padding-bottom: 5px;">{title}</h4>
    <div style="padding: 8px 0; font-size: 13px;">
        <b>📅 Data:</b> {date}<br>
        <b>📍 Località:</b> {location}<br>
        <b>🏃 Tipo:</b> {category}<br>
        <hr style="margin: 5px 0; border: 0; border-top: 1px solid #eee;">
        <b>📏 Distanza:</b> {distance:.2} km<br>
        <b>⛰️ Dislivello:</b> +{uphill:.0} m<br>
    </div>
    <a href="{link}" target="_blank"
       style="display: block; text-align: center; background: {color}; color: white;
              text-decoration: none; padding: 5px; border-radius: 4px; font-size: 12px; font-weight: bold;">
       Vedi Dettagli Online
    </a>
</div>"#,
        color = color,
        title = escape_html(&route.title),
        date = escape_html(&route.date),
        location = escape_html(&route.location),
        category = escape_html(&route.category),
        distance = track.length_km(),
        uphill = track.uphill(),
        link = escape_html(&route.link),
    )
}

/// Add the marker and line of a route to its layer, returns false if the track has no points
pub fn add_route(
    group: &mut FeatureGroup,
    route: &RouteRecord,
    track: &TrackSummary,
    color: &str,
) -> bool {
    let start: Location = match track.points().first() {
        Some(loc) => *loc,
        None => return false,
    };

    group.add_marker(Marker {
        location: start,
        icon: Icon::info(color),
        popup: Some(Popup {
            html: popup_html(route, track, color),
            max_width: POPUP_MAX_WIDTH,
        }),
    });
    group.add_line(PolyLine {
        locations: track.points().to_vec(),
        color: color.to_string(),
        weight: LINE_WEIGHT,
        opacity: LINE_OPACITY,
        tooltip: Some(route.title.clone()),
    });
    true
}

/// Escape text so it displays literally inside HTML
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
