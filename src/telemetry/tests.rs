//! Telemetry Module Tests
//!
//! ## Test Scopes
//! - **Store**: Register/read-back, CSV header handling, failed durable writes.
//! - **Concurrency**: Many simultaneous writers yield one row each, in the same
//!   order on disk as in memory.
//! - **Remote**: HTTP register/readAll, connection invalidation by generation.

#[cfg(test)]
mod tests {
    use crate::telemetry::client::{RemoteTelemetry, TelemetrySender};
    use crate::telemetry::handlers::router;
    use crate::telemetry::store::TelemetryStore;
    use crate::telemetry::types::{LogEntry, LogRow, MachineKind};
    use chrono::{Local, TimeZone};
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    fn sample_entry(i: usize) -> LogEntry {
        let start = Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
            + chrono::Duration::milliseconds(i as i64);
        LogEntry {
            start_time: start,
            end_time: start + chrono::Duration::microseconds(1500),
            machine_id: format!("worker-{}", i % 4),
            machine_kind: MachineKind::Worker,
            query_text: format!("query {}", i),
            processing_time_seconds: 0.0015,
            score: (i * 10) as f64,
            age_group_label: "adulto".to_string(),
        }
    }

    fn render(row: &LogRow) -> String {
        [
            row.timestamp_ini.as_str(),
            row.timestamp_fin.as_str(),
            row.maquina.as_str(),
            row.tipo_maquina.as_str(),
            row.query.as_str(),
            row.tiempo_fin.as_str(),
            row.score.as_str(),
            row.rango_etario.as_str(),
        ]
        .join(", ")
    }

    async fn spawn_store(store: Arc<TelemetryStore>) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(store)).await.unwrap();
        });
        format!("http://{}", addr)
    }

    // ============================================================
    // LOG ENTRY
    // ============================================================

    #[test]
    fn test_entry_display_renders_all_fields() {
        let entry = sample_entry(3);
        assert_eq!(
            entry.to_string(),
            "2024-05-01T12:00:00.003000, 2024-05-01T12:00:00.004500, worker-3, worker, query 3, 0.0015, 30, adulto"
        );
    }

    #[test]
    fn test_entry_json_uses_column_names() {
        let value = serde_json::to_value(sample_entry(1)).unwrap();
        assert_eq!(value["maquina"], "worker-1");
        assert_eq!(value["tipo_maquina"], "worker");
        assert_eq!(value["query"], "query 1");
        assert_eq!(value["rango_etario"], "adulto");

        let restored: LogEntry = serde_json::from_value(value).unwrap();
        assert_eq!(restored, sample_entry(1));
    }

    #[test]
    fn test_machine_kind_wire_names() {
        assert_eq!(serde_json::to_string(&MachineKind::Master).unwrap(), "\"master\"");
        assert_eq!(serde_json::to_string(&MachineKind::Worker).unwrap(), "\"worker\"");
    }

    // ============================================================
    // STORE
    // ============================================================

    #[test]
    fn test_register_then_read_all_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = TelemetryStore::new(dir.path().join("logs.csv"));

        let entry = sample_entry(7);
        store.register(entry.clone());

        let entries = store.read_all();
        assert_eq!(entries, vec![entry.to_string()]);

        let fields: Vec<&str> = entries[0].split(", ").collect();
        assert_eq!(fields.len(), 8);
        assert_eq!(fields[2], entry.machine_id);
        assert_eq!(fields[3], "worker");
        assert_eq!(fields[4], entry.query_text);
        assert_eq!(fields[6], "70");
        assert_eq!(fields[7], entry.age_group_label);
    }

    #[test]
    fn test_header_written_once_for_new_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs.csv");
        let store = TelemetryStore::new(&path);

        store.register(sample_entry(0));
        store.register(sample_entry(1));

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "timestamp_ini,timestamp_fin,maquina,tipo_maquina,query,tiempo_fin,score,rango_etario"
        );
        assert_eq!(content.matches("timestamp_ini").count(), 1);
    }

    #[test]
    fn test_existing_file_is_appended_without_new_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs.csv");

        TelemetryStore::new(&path).register(sample_entry(0));
        let restarted = TelemetryStore::new(&path);
        restarted.register(sample_entry(1));

        // The new instance only remembers its own entries
        assert_eq!(restarted.len(), 1);

        let rows = restarted.read_durable().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], sample_entry(0).to_row());
        assert_eq!(rows[1], sample_entry(1).to_row());
    }

    #[test]
    fn test_queries_with_commas_and_quotes_survive_csv() {
        let dir = TempDir::new().unwrap();
        let store = TelemetryStore::new(dir.path().join("logs.csv"));

        let mut entry = sample_entry(0);
        entry.query_text = "guerra, paz y \"otros\"".to_string();
        store.register(entry.clone());

        let rows = store.read_durable().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].query, entry.query_text);
    }

    #[test]
    fn test_failed_durable_write_keeps_entry_in_memory() {
        let dir = TempDir::new().unwrap();
        let store = TelemetryStore::new(dir.path().join("missing").join("logs.csv"));

        store.register(sample_entry(0));

        assert_eq!(store.len(), 1);
        assert_eq!(store.read_all(), vec![sample_entry(0).to_string()]);
        assert!(store.read_durable().unwrap().is_empty());
    }

    #[test]
    fn test_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = TelemetryStore::new(dir.path().join("logs.csv"));

        assert!(store.is_empty());
        assert!(store.read_all().is_empty());
        assert!(store.read_durable().unwrap().is_empty());
    }

    // ============================================================
    // CONCURRENCY
    // ============================================================

    #[test]
    fn test_concurrent_writers_produce_one_row_each_in_same_order() {
        const WRITERS: usize = 16;
        const PER_WRITER: usize = 25;

        let dir = TempDir::new().unwrap();
        let store = Arc::new(TelemetryStore::new(dir.path().join("logs.csv")));

        let handles: Vec<_> = (0..WRITERS)
            .map(|w| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for i in 0..PER_WRITER {
                        store.register(sample_entry(w * PER_WRITER + i));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let in_memory = store.read_all();
        let durable = store.read_durable().unwrap();

        assert_eq!(in_memory.len(), WRITERS * PER_WRITER);
        assert_eq!(durable.len(), WRITERS * PER_WRITER);

        let durable_rendered: Vec<String> = durable.iter().map(render).collect();
        assert_eq!(durable_rendered, in_memory);

        let mut queries: Vec<&str> = durable.iter().map(|r| r.query.as_str()).collect();
        queries.sort();
        queries.dedup();
        assert_eq!(queries.len(), WRITERS * PER_WRITER, "no row lost or duplicated");
    }

    // ============================================================
    // REMOTE
    // ============================================================

    #[tokio::test]
    async fn test_remote_register_and_read_all() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(TelemetryStore::new(dir.path().join("logs.csv")));
        let base_url = spawn_store(store.clone()).await;

        let client = RemoteTelemetry::new(&base_url, Duration::from_secs(5));
        assert!(!client.has_connection());

        client.register(sample_entry(1)).await.unwrap();
        client.register(sample_entry(2)).await.unwrap();

        assert!(client.has_connection());
        assert_eq!(store.len(), 2);

        let entries = client.read_all().await.unwrap();
        assert_eq!(entries, vec![sample_entry(1).to_string(), sample_entry(2).to_string()]);
    }

    #[tokio::test]
    async fn test_remote_concurrent_writers() {
        const WRITERS: usize = 50;

        let dir = TempDir::new().unwrap();
        let store = Arc::new(TelemetryStore::new(dir.path().join("logs.csv")));
        let base_url = spawn_store(store.clone()).await;

        let handles: Vec<_> = (0..WRITERS)
            .map(|i| {
                let url = base_url.clone();
                tokio::spawn(async move {
                    let client = RemoteTelemetry::new(&url, Duration::from_secs(5));
                    client.register(sample_entry(i)).await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let in_memory = store.read_all();
        let durable: Vec<String> = store.read_durable().unwrap().iter().map(render).collect();
        assert_eq!(in_memory.len(), WRITERS);
        assert_eq!(durable, in_memory);
    }

    #[tokio::test]
    async fn test_stale_failure_keeps_rebuilt_connection() {
        let client = RemoteTelemetry::new("http://127.0.0.1:9", Duration::from_millis(100));

        let (first, _) = client.connection().unwrap();
        client.invalidate(first);
        assert!(!client.has_connection());

        // Another task rebuilds the connection before the first one reports its failure
        let (second, _) = client.connection().unwrap();
        assert_ne!(first, second);
        client.invalidate(first);
        assert!(client.has_connection());

        // Reusing the live connection keeps its generation
        let (again, _) = client.connection().unwrap();
        assert_eq!(again, second);

        client.invalidate(second);
        assert!(!client.has_connection());
    }

    #[tokio::test]
    async fn test_failed_delivery_drops_connection_and_recovers() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = RemoteTelemetry::new(&format!("http://{}", addr), Duration::from_millis(500));
        assert!(client.register(sample_entry(0)).await.is_err());
        assert!(!client.has_connection());

        // Bring a store up on the same port; the next attempt reconnects
        let dir = TempDir::new().unwrap();
        let store = Arc::new(TelemetryStore::new(dir.path().join("logs.csv")));
        let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
        let app = router(store.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        client.register(sample_entry(1)).await.unwrap();
        assert!(client.has_connection());
        assert_eq!(store.len(), 1);
    }
}
