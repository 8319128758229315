//! End-to-end flows against a scripted transport.
//!
//! These tests exercise the full discovery → fetch → parse pipeline the
//! way a host application drives it, with every device response
//! scripted through `MockTransport`.

use scilog_core::mock::MockTransport;
use scilog_core::{cycle_duration, Autoclave, DurationSource, Error};
use scilog_types::{CycleType, ParsedCycleLog};

const CATALOG: &str = r#"<html><script>
var cyclesInfo = [
    {"records_id": 3, "cycle_start_time": 1759913692,
     "file_name": "S20251008_0001755_710123B00004",
     "cycle_number": 1755, "cycle_id": "STATCLAVE_120V_solid_wrapped_132_4min"},
    {"records_id": 2, "cycle_start_time": 1759910000,
     "file_name": "S20251008_0001754_710123B00004",
     "cycle_number": 1754, "cycle_id": "STATCLAVE_120V_rubber_plastics_121_30min"},
    {"records_id": 1, "cycle_start_time": 1759827292,
     "file_name": "S20251007_0001753_710123B00004",
     "cycle_number": 1753, "cycle_id": ""}
];
</script></html>"#;

const TELEMETRY_1755: &str = r#"{
    "date": "2025/10/08",
    "number": "001755",
    "runmode": "normal",
    "display_units": "metric",
    "log": "STATCLAVE G4 SBS1R118\r\nSN 710123B00004\r\nUnit # : 01\r\n322 uS / 1.8 ppm\r\nSolid/Wrapped\r\n132 C/4min\r\nCYCLE NUMBER 001755\r\n9:54:52   08/10/2025\r\nMin. steri. Values:\r\n135.2 C  317kPa\r\nMax. steri. Values:\r\n137.4 C  329kPa\r\nSTERILIZING 3:36\r\nDRYING START 8:42\r\nDRYING END 38:42\r\nCYCLE COMPLETE 45:12\r\nDigital Signature #\r\n3F2A9C04B1E7\r\n",
    "status": "Cycle complete",
    "temp": "121.0,130.2,135.1",
    "pressure": "101,210,315",
    "succeeded": true
}"#;

fn device(transport: &MockTransport) -> Autoclave<MockTransport> {
    Autoclave::with_transport("192.168.1.50", 80, transport.clone()).unwrap()
}

#[tokio::test]
async fn full_sync_pass_parses_and_classifies_new_cycles() {
    let transport = MockTransport::new();
    transport.respond("/us/archives.php", 200, CATALOG);
    transport.respond("_0001755_", 200, TELEMETRY_1755);
    let device = device(&transport);

    let new_cycles = device.cycles_since(1754).await.unwrap();
    assert_eq!(new_cycles.len(), 1);
    let cycle = new_cycles[0];
    assert_eq!(cycle.cycle_number, 1755);
    assert_eq!((cycle.year, cycle.month, cycle.day), (2025, 10, 8));

    let telemetry = device
        .fetch_cycle_data(cycle.year, cycle.month, cycle.day, cycle.cycle_number)
        .await
        .unwrap();
    assert!(telemetry.succeeded);

    let log = ParsedCycleLog::parse(&telemetry.raw_log).unwrap();
    assert_eq!(log.model, "STATCLAVE G4 SBS1R118");
    assert_eq!(log.cycle_number, 1755);
    assert_eq!(log.target_temp, Some(132));

    let kind = CycleType::classify(
        telemetry.runmode.as_deref(),
        telemetry.status_line.as_deref(),
        Some("STATCLAVE_120V_solid_wrapped_132_4min"),
    );
    assert_eq!(kind, CycleType::SteamPrevacuum);

    let duration = cycle_duration(&telemetry);
    assert_eq!(duration.minutes, 45);
    assert_eq!(duration.source, DurationSource::CycleLog);
}

#[tokio::test]
async fn one_bad_cycle_does_not_block_the_rest() {
    let transport = MockTransport::new();
    transport.respond("/us/archives.php", 200, CATALOG);
    transport.respond("_0001754_", 404, "");
    transport.respond("_0001755_", 200, TELEMETRY_1755);
    let device = device(&transport);

    let new_cycles = device.cycles_since(1753).await.unwrap();
    assert_eq!(new_cycles.len(), 2);

    // The host retries failed cycles on the next pass; a 404 on one
    // cycle must not prevent fetching the others.
    let mut fetched = 0;
    let mut failed = 0;
    for cycle in &new_cycles {
        match device
            .fetch_cycle_data(cycle.year, cycle.month, cycle.day, cycle.cycle_number)
            .await
        {
            Ok(_) => fetched += 1,
            Err(Error::Http { status: 404, .. }) => failed += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(fetched, 1);
    assert_eq!(failed, 1);
}

#[tokio::test]
async fn connection_test_end_to_end() {
    let transport = MockTransport::new();
    transport.respond(
        "/data/cycles.cgi",
        200,
        r#"[{"year": 2025, "months": [{"month": 10}]}]"#,
    );
    transport.respond("/us/archives.php", 200, CATALOG);
    transport.respond("/data/cycleData.php", 200, TELEMETRY_1755);

    let result = device(&transport).test_connection().await;
    assert!(result.ok);
    assert_eq!(result.model.as_deref(), Some("STATCLAVE G4 SBS1R118"));
    assert!(result.error.is_none());
}

#[tokio::test]
async fn listing_fallback_is_not_invoked_when_primary_matches() {
    let transport = MockTransport::new();
    transport.respond(
        "/data/file_reader.php",
        200,
        "S20251008_01755_710123B00004.txt S20251008_01755_710123B00004.cpt",
    );
    transport.respond("/us/archives.php", 200, CATALOG);

    let files = device(&transport)
        .list_directory_files("/opt/data/scilog/2025/10/08")
        .await
        .unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(transport.call_count("/data/file_reader.php"), 1);
    assert_eq!(transport.call_count("/us/archives.php"), 0);
}

#[tokio::test]
async fn listing_falls_back_to_archive_page() {
    let transport = MockTransport::new();
    transport.respond("/data/file_reader.php", 500, "");
    transport.respond("/us/archives.php", 200, CATALOG);

    let files = device(&transport)
        .list_directory_files("/opt/data/scilog/2025/10/08")
        .await
        .unwrap();
    // Both October 8 stems from the catalog, October 7 excluded.
    assert_eq!(
        files,
        vec![
            "S20251008_0001755_710123B00004",
            "S20251008_0001754_710123B00004",
        ],
    );
    assert_eq!(transport.call_count("/us/archives.php"), 1);
}

#[tokio::test]
async fn month_enumeration_matches_catalog() {
    let transport = MockTransport::new();
    transport.respond("/us/archives.php", 200, CATALOG);

    let days = device(&transport).fetch_month_cycles(2025, 10).await.unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].day, 7);
    assert_eq!(days[1].day, 8);
    assert_eq!(days[1].cycle_numbers, vec!["01755", "01754"]);

    let latest = device(&transport).latest_cycle().await.unwrap().unwrap();
    assert_eq!(latest.cycle_number, 1755);
}

#[tokio::test]
async fn unreachable_device_surfaces_renderable_error() {
    let transport = MockTransport::new();
    transport.refuse("/data/cycles.cgi", "connection refused");

    let result = device(&transport).test_connection().await;
    assert!(!result.ok);
    assert!(result.error.unwrap().contains("connection refused"));
}
