pub mod chart_config;
pub mod series_style;
pub mod theme;
