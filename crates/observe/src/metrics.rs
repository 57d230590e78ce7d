use {
    prometheus::Encoder,
    std::{path::Path, sync::OnceLock},
};

/// Global metrics registry used by all components.
static REGISTRY: OnceLock<prometheus_metric_storage::StorageRegistry> = OnceLock::new();

/// Get the global instance of the metrics registry.
pub fn get_registry() -> &'static prometheus::Registry {
    get_storage_registry().registry()
}

/// Get the global instance of the metric storage registry. It gets created
/// with default settings on first use.
pub fn get_storage_registry() -> &'static prometheus_metric_storage::StorageRegistry {
    REGISTRY.get_or_init(prometheus_metric_storage::StorageRegistry::default)
}

/// Renders all metrics of the registry in the prometheus text format.
pub fn encode(registry: &prometheus::Registry) -> prometheus::Result<String> {
    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&registry.gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Writes the current state of the global registry to `path`, in the format
/// expected by the node exporter's textfile collector.
pub async fn write_to_file(path: &Path) -> std::io::Result<()> {
    let encoded = encode(get_registry()).map_err(std::io::Error::other)?;
    tokio::fs::write(path, encoded).await
}
