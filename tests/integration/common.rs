//! Shared fixtures for the integration tests

use dapo_harvest::config::{BackoffStrategy, Config, RegistryConfig};
use dapo_harvest::crawler::{Backoff, Fetcher, RetryPolicy};
use serde_json::{json, Value};
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PROVINCE_CODE: &str = "020000";
pub const BANDUNG_CODE: &str = "026000";
pub const GARUT_CODE: &str = "020500";
pub const COBLONG_CODE: &str = "026001";

/// Registry settings pointing both hosts at the mock server
pub fn registry_config(server: &MockServer) -> RegistryConfig {
    RegistryConfig {
        base_url: server.uri(),
        profile_base_url: server.uri(),
        request_timeout_secs: 5,
        accept_invalid_certs: false,
        ..RegistryConfig::default()
    }
}

/// Gives up quickly so unmatched requests cannot stall a test
pub fn quick_policy() -> RetryPolicy {
    RetryPolicy::bounded(3, Backoff::Fixed(Duration::from_millis(1)))
}

pub fn test_fetcher(server: &MockServer) -> Fetcher {
    Fetcher::new(&registry_config(server), quick_policy()).unwrap()
}

/// Harvest config targeting Bandung, writing to `csv`
pub fn test_config(server: &MockServer, csv: &Path) -> Config {
    let mut config = Config::default();
    config.registry = registry_config(server);
    config.retry.strategy = BackoffStrategy::Fixed;
    config.retry.backoff_ms = 1;
    config.retry.max_attempts = Some(2);
    config.output.csv_path = csv.to_string_lossy().into_owned();
    config.targets.cities = vec!["bandung".to_string()];
    config
}

pub fn region(name: &str, code: &str, level: u8) -> Value {
    json!({
        "nama": name,
        // The registry pads codes with spaces
        "kode_wilayah": format!("{}  ", code),
        "id_level_wilayah": level,
    })
}

pub fn school(id: &str, name: &str, form: &str, status: &str) -> Value {
    json!({
        "sekolah_id_enkrip": id,
        "nama": name,
        "bentuk_pendidikan": form,
        "status_sekolah": status,
    })
}

pub fn profile_page(npsn: &str, form: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html><body>
<div class="profile-usermenu"><ul>
    <li><a>Kepsek : Dra. Siti Aminah</a></li>
    <li><a>Akreditasi : A</a></li>
</ul></div>
<div id="profil">
    <div class="panel panel-info">
        <div class="panel-heading">Identitas Sekolah</div>
        <div class="panel-body">
            <p><strong>NPSN :</strong> {npsn}</p>
            <p><strong>Status :</strong> Negeri</p>
            <p><strong>Bentuk Pendidikan :</strong> {form}</p>
        </div>
    </div>
    <div class="panel panel-info">
        <div class="panel-heading">Data Rinci</div>
        <div class="panel-body">
            <p><strong>Sumber Listrik :</strong> PLN</p>
        </div>
    </div>
</div>
<div id="kontak">
    <div class="panel panel-info"><div class="panel-body">
        <p><strong>Alamat :</strong> Jl. Ir. H. Juanda, No. 93</p>
        <p><strong>Kode Pos :</strong> 40132</p>
    </div></div>
</div>
</body></html>"#
    )
}

pub fn recap(teachers: (u64, u64), students: (u64, u64)) -> Value {
    json!([{
        "ptk_laki": teachers.0,
        "ptk_perempuan": teachers.1,
        "pegawai_laki": 1,
        "pegawai_perempuan": 2,
        "pd_laki": students.0,
        "pd_perempuan": students.1,
        "after_ruang_kelas": null,
        "before_ruang_kelas": 12,
        "after_ruang_perpus": 1,
        "rombel": 12,
    }])
}

/// Mounts a region list for `level`/`code` on `/rekap/dataSekolah`
pub async fn mount_region_list(server: &MockServer, level: u8, code: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/rekap/dataSekolah"))
        .and(query_param("id_level_wilayah", level.to_string()))
        .and(query_param("kode_wilayah", code))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts the school list of a district on `/rekap/progresSP`
pub async fn mount_school_list(server: &MockServer, code: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path("/rekap/progresSP"))
        .and(query_param("id_level_wilayah", "3"))
        .and(query_param("kode_wilayah", code))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts the recap and the profile page of one school, each expected `times` times
pub async fn mount_school(server: &MockServer, id: &str, recap: Value, profile: String, times: u64) {
    Mock::given(method("GET"))
        .and(path("/rekap/sekolahDetail"))
        .and(query_param("sekolah_id", id))
        .respond_with(ResponseTemplate::new(200).set_body_json(recap))
        .expect(times)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/sekolah/{}", id)))
        .respond_with(ResponseTemplate::new(200).set_body_string(profile))
        .expect(times)
        .mount(server)
        .await;
}

/// Mounts Prov. Jawa Barat with Kota Bandung (one district) and Kab. Garut
///
/// Garut's districts are expected never to be requested.
pub async fn mount_tree(server: &MockServer, schools: Value) {
    mount_region_list(
        server,
        0,
        "000000",
        json!([region("Prov. Jawa Barat", PROVINCE_CODE, 1)]),
    )
    .await;
    mount_region_list(
        server,
        1,
        PROVINCE_CODE,
        json!([
            region("Kab. Garut", GARUT_CODE, 2),
            region("Kota Bandung", BANDUNG_CODE, 2),
        ]),
    )
    .await;
    mount_region_list(
        server,
        2,
        BANDUNG_CODE,
        json!([region("Kec. Coblong", COBLONG_CODE, 3)]),
    )
    .await;
    Mock::given(method("GET"))
        .and(query_param("kode_wilayah", GARUT_CODE))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(server)
        .await;
    mount_school_list(server, COBLONG_CODE, schools).await;
}
