//! End-to-end harvest tests
//!
//! These drive the coordinator against a mock registry and check what lands
//! in the sink.

use crate::common::*;
use dapo_harvest::extract::{headers, FlatRecord, ProfileSections, RecapFigures};
use dapo_harvest::region::{LocatedSchool, SchoolSummary};
use dapo_harvest::storage::{CsvStore, RecordStore, StorageResult};
use dapo_harvest::Coordinator;
use serde_json::json;
use std::collections::HashSet;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Record store that keeps rows in memory
#[derive(Default)]
struct MemoryStore {
    seeded: HashSet<String>,
    appended: Vec<FlatRecord>,
}

impl RecordStore for MemoryStore {
    fn ensure_initialized(&mut self) -> StorageResult<()> {
        Ok(())
    }

    fn load_processed_ids(&self) -> StorageResult<HashSet<String>> {
        let mut ids = self.seeded.clone();
        ids.extend(self.appended.iter().map(|r| r.id().to_string()));
        Ok(ids)
    }

    fn append(&mut self, record: &FlatRecord) -> StorageResult<()> {
        self.appended.push(record.clone());
        Ok(())
    }
}

fn cell<'a>(row: &'a [String], header: &str) -> &'a str {
    let index = headers().iter().position(|h| *h == header).unwrap();
    &row[index]
}

#[tokio::test]
async fn test_full_harvest_writes_rows() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("result").join("schools.csv");

    mount_tree(
        &server,
        json!([
            school("QUFB", "SD Negeri 1 Bandung", "SD", "Negeri"),
            school("TKTK", "TK Pelangi", "TK", "Swasta"),
            school("QkJC", "SMP Swasta Bakti", "SMP", "Swasta"),
        ]),
    )
    .await;
    mount_school(&server, "QUFB", recap((3, 4), (120, 131)), profile_page("20219184", "SD"), 1).await;
    mount_school(&server, "QkJC", recap((5, 5), (80, 90)), profile_page("20219999", "SMP"), 1).await;
    mount_school(&server, "TKTK", recap((1, 1), (1, 1)), profile_page("0", "TK"), 0).await;

    let mut coordinator = Coordinator::new(test_config(&server, &csv)).unwrap();
    let summary = coordinator.run().await.unwrap();

    assert_eq!(summary.walk.provinces, 1);
    assert_eq!(summary.walk.cities_matched, 1);
    assert_eq!(summary.walk.cities_pruned, 1);
    assert_eq!(summary.walk.districts, 1);
    assert_eq!(summary.walk.schools_listed, 3);
    assert_eq!(summary.walk.schools_filtered, 1);
    assert_eq!(summary.schools_eligible, 2);
    assert_eq!(summary.extracted, 2);
    assert_eq!(summary.skipped, 0);

    let rows = CsvStore::new(&csv).read_rows().unwrap().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], headers());

    let first = &rows[1];
    assert_eq!(cell(first, "sekolah_id_enkrip"), "QUFB");
    assert_eq!(cell(first, "Nama_Sekolah"), "SD Negeri 1 Bandung");
    assert_eq!(cell(first, "Provinsi"), "Prov. Jawa Barat");
    assert_eq!(cell(first, "Kota_Kabupaten"), "Kota Bandung");
    assert_eq!(cell(first, "Kecamatan"), "Kec. Coblong");
    assert_eq!(cell(first, "NPSN"), "20219184");
    assert_eq!(cell(first, "Kepsek"), "Dra. Siti Aminah");
    assert_eq!(cell(first, "Alamat"), "Jl. Ir. H. Juanda, No. 93");
    assert_eq!(cell(first, "Sumber_Listrik"), "PLN");
    assert_eq!(cell(first, "Guru_Total"), "7");
    assert_eq!(cell(first, "PTK_Total"), "10");
    assert_eq!(cell(first, "Peserta_Didik_Total"), "251");
    assert_eq!(cell(first, "Ruang_Kelas"), "12");
    assert_eq!(cell(first, "Ruang_Perpus"), "1");
    assert_eq!(cell(first, "Nama_Bank"), "");

    assert_eq!(cell(&rows[2], "sekolah_id_enkrip"), "QkJC");
}

#[tokio::test]
async fn test_second_run_adds_nothing() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("schools.csv");

    mount_tree(&server, json!([school("QUFB", "SD Negeri 1 Bandung", "SD", "Negeri")])).await;
    // Fetched by the first run only
    mount_school(&server, "QUFB", recap((1, 1), (10, 10)), profile_page("1", "SD"), 1).await;

    let config = test_config(&server, &csv);
    Coordinator::new(config.clone()).unwrap().run().await.unwrap();
    let before = std::fs::read(&csv).unwrap();

    let summary = Coordinator::new(config).unwrap().run().await.unwrap();

    assert_eq!(summary.schools_eligible, 1);
    assert_eq!(summary.already_processed, 1);
    assert_eq!(summary.extracted, 0);
    assert_eq!(std::fs::read(&csv).unwrap(), before);
}

#[tokio::test]
async fn test_resume_only_appends_new_schools() {
    let server = MockServer::start().await;

    mount_tree(
        &server,
        json!([
            school("A", "SD A", "SD", "Negeri"),
            school("B", "SD B", "SD", "Negeri"),
            school("C", "SD C", "SD", "Negeri"),
        ]),
    )
    .await;
    mount_school(&server, "A", recap((1, 1), (1, 1)), profile_page("1", "SD"), 0).await;
    mount_school(&server, "B", recap((1, 1), (1, 1)), profile_page("2", "SD"), 0).await;
    mount_school(&server, "C", recap((1, 1), (1, 1)), profile_page("3", "SD"), 1).await;

    let store = MemoryStore {
        seeded: HashSet::from(["A".to_string(), "B".to_string()]),
        appended: Vec::new(),
    };
    let dir = TempDir::new().unwrap();
    let config = test_config(&server, &dir.path().join("unused.csv"));

    let mut coordinator = Coordinator::with_store(config, store).unwrap();
    let summary = coordinator.run().await.unwrap();

    assert_eq!(summary.already_processed, 2);
    assert_eq!(summary.extracted, 1);

    let appended: Vec<_> = coordinator.store().appended.iter().map(|r| r.id()).collect();
    assert_eq!(appended, vec!["C"]);
    assert!(coordinator.processed().contains("C"));
}

#[tokio::test]
async fn test_resume_from_existing_csv() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("schools.csv");

    let mut existing = CsvStore::new(&csv);
    existing.ensure_initialized().unwrap();
    let earlier = LocatedSchool {
        school: SchoolSummary {
            id: "A".to_string(),
            name: "SD A".to_string(),
            education_form: "SD".to_string(),
            ownership: "Negeri".to_string(),
        },
        province: "Prov. Jawa Barat".to_string(),
        city: "Kota Bandung".to_string(),
        district: "Kec. Coblong".to_string(),
    };
    existing
        .append(&FlatRecord::build(
            &earlier,
            &ProfileSections::default(),
            &RecapFigures::default(),
        ))
        .unwrap();

    mount_tree(
        &server,
        json!([school("A", "SD A", "SD", "Negeri"), school("B", "SD B", "SD", "Negeri")]),
    )
    .await;
    mount_school(&server, "A", recap((1, 1), (1, 1)), profile_page("1", "SD"), 0).await;
    mount_school(&server, "B", recap((1, 1), (1, 1)), profile_page("2", "SD"), 1).await;

    let summary = Coordinator::new(test_config(&server, &csv))
        .unwrap()
        .run()
        .await
        .unwrap();
    assert_eq!(summary.extracted, 1);

    let ids = CsvStore::new(&csv).load_processed_ids().unwrap();
    assert_eq!(ids, HashSet::from(["A".to_string(), "B".to_string()]));
}

#[tokio::test]
async fn test_empty_recap_skips_school() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("schools.csv");

    mount_tree(
        &server,
        json!([school("EMPTY", "SD Kosong", "SD", "Negeri"), school("OK", "SD Ada", "SD", "Negeri")]),
    )
    .await;
    mount_school(&server, "EMPTY", json!([]), profile_page("1", "SD"), 1).await;
    mount_school(&server, "OK", recap((1, 1), (1, 1)), profile_page("2", "SD"), 1).await;

    let summary = Coordinator::new(test_config(&server, &csv))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.extracted, 1);

    let ids = CsvStore::new(&csv).load_processed_ids().unwrap();
    assert_eq!(ids, HashSet::from(["OK".to_string()]));
}

#[tokio::test]
async fn test_failed_district_list_is_skipped() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("schools.csv");

    // No school list mounted: the district request falls through to this
    mount_tree(&server, json!("maintenance")).await;
    Mock::given(method("GET"))
        .and(path("/rekap/sekolahDetail"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let summary = Coordinator::new(test_config(&server, &csv))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(summary.walk.districts, 1);
    assert_eq!(summary.walk.lists_failed, 1);
    assert_eq!(summary.schools_eligible, 0);
    assert_eq!(CsvStore::new(&csv).read_rows().unwrap().unwrap().len(), 1);
}

#[tokio::test]
async fn test_school_listed_twice_is_written_once() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let csv = dir.path().join("schools.csv");

    mount_tree(
        &server,
        json!([
            school("A", "SD A", "SD", "Negeri"),
            school("A", "SD A", "SD", "Negeri"),
        ]),
    )
    .await;
    mount_school(&server, "A", recap((1, 1), (1, 1)), profile_page("1", "SD"), 1).await;

    let summary = Coordinator::new(test_config(&server, &csv))
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(summary.schools_eligible, 2);
    assert_eq!(summary.extracted, 1);
    assert_eq!(summary.already_processed, 1);

    let rows = CsvStore::new(&csv).read_rows().unwrap().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(cell(&rows[1], "sekolah_id_enkrip"), "A");
}
