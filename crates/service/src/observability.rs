use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static EMPLOYEES_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "employee_registry_created_total",
        "Total employee records created"
    )
    .expect("register created_total")
});

pub static EMPLOYEES_UPDATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "employee_registry_updated_total",
        "Total employee records updated"
    )
    .expect("register updated_total")
});

pub static EMPLOYEES_DELETED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "employee_registry_deleted_total",
        "Total employee records deleted"
    )
    .expect("register deleted_total")
});

pub static STORAGE_ERRORS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "employee_registry_storage_errors_total",
        "Total requests failed by a storage fault"
    )
    .expect("register storage_errors_total")
});

pub static STORE_RESETS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "employee_registry_store_resets_total",
        "Total times a corrupt data file was reset to an empty list"
    )
    .expect("register store_resets_total")
});

/// Render the default registry in the Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    // Touch every counter so a fresh process exports zeros instead of nothing.
    Lazy::force(&EMPLOYEES_CREATED_TOTAL);
    Lazy::force(&EMPLOYEES_UPDATED_TOTAL);
    Lazy::force(&EMPLOYEES_DELETED_TOTAL);
    Lazy::force(&STORAGE_ERRORS_TOTAL);
    Lazy::force(&STORE_RESETS_TOTAL);

    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&prometheus::gather(), &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
