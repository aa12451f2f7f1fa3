//! Build the static legend listing the color of each route category
use crate::config::{ColorMap, DEFAULT_COLOR_KEY};
use crate::popup::escape_html;

/// Render the legend panel, one swatch per configured category except the default entry
pub fn legend_html(colors: &ColorMap) -> String {
    let items: String = colors
        .iter()
        .filter(|(category, _)| *category != DEFAULT_COLOR_KEY)
        .map(|(category, color)| {
            format!(
                r#"<div><i style="background:{}; width:10px; height:10px; display:inline-block;"></i> {}</div>"#,
                escape_html(color),
                escape_html(category)
            )
        })
        .collect();

    format!(
        r#"<div style="position: fixed; bottom: 30px; left: 30px; width: 120px; z-index:9999;
     background:white; padding: 10px; border:2px solid gray; border-radius:5px; font-size:12px;">
     <b>LEGENDA</b><br>{}
</div>"#,
        items
    )
}
