use std::fs;
use std::path::PathBuf;

use rxn_core::{HalfInteger, Parity, ParticleCollection, ParticleLookup, ParticleRecord, RxnError};

fn fixture_records() -> Vec<ParticleRecord> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../fixtures/particles.yaml");
    let bytes = fs::read(path).unwrap();
    serde_yaml::from_slice(&bytes).unwrap()
}

#[test]
fn fixture_table_resolves_by_name_and_pid() {
    let collection = ParticleCollection::from_records(fixture_records()).unwrap();
    let pi0 = collection.find("pi0").unwrap();
    assert_eq!(pi0.pid, 111);
    assert_eq!(pi0.c_parity, Some(Parity::Plus));
    assert_eq!(pi0.isospin.unwrap().magnitude(), HalfInteger::ONE);

    let electron = collection.find_pid(11).unwrap();
    assert_eq!(electron.name, "e-");
    assert_eq!(electron.spin, HalfInteger::HALF);
    assert!(electron.is_lepton());
    assert!(electron.is_fermion());
}

#[test]
fn missing_particles_report_the_key() {
    let collection = ParticleCollection::from_records(fixture_records()).unwrap();
    match collection.find("nonexistent") {
        Err(RxnError::ParticleNotFound(info)) => {
            assert_eq!(info.code, "particle-not-found");
            assert_eq!(info.context.get("name"), Some(&"nonexistent".to_string()));
        }
        other => panic!("unexpected lookup result: {other:?}"),
    }
    let err = collection.find_pid(999_999).unwrap_err();
    assert_eq!(err.code(), "particle-not-found");
}

#[test]
fn iteration_is_sorted_by_name() {
    let collection = ParticleCollection::from_records(fixture_records()).unwrap();
    let names: Vec<String> = collection.particles().map(|p| p.name.clone()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert_eq!(names.len(), collection.len());
}

#[test]
fn duplicate_names_are_rejected() {
    let mut records = fixture_records();
    let mut copy = records[0].clone();
    copy.pid = 424_242;
    records.push(copy);
    let err = ParticleCollection::from_records(records).unwrap_err();
    assert!(matches!(err, RxnError::Config(ref info) if info.code == "duplicate-particle"));
}

#[test]
fn invalid_isospin_fails_to_parse() {
    let yaml = "name: bad\npid: 1\nmass: 1.0\nspin: 0\nisospin: {magnitude: 0.5, projection: 1}\n";
    let parsed: Result<ParticleRecord, _> = serde_yaml::from_str(yaml);
    assert!(parsed.is_err());
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = ParticleCollection::new().find("x").unwrap_err();
    let json = serde_json::to_value(&err).unwrap();
    assert_eq!(json["family"], "ParticleNotFound");
    assert_eq!(json["detail"]["code"], "particle-not-found");
}
