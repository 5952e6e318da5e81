pub mod chart_service;
pub mod encoder_service;
pub mod metric_service;
pub mod plot_surface;
pub mod selection_service;
pub mod snapshot_service;
pub mod treemap_layout;

#[cfg(test)]
pub mod test_support;
