//! Session discovery over an unordered process stream

mod common;

use common::SnapshotBuilder;
use pretty_assertions::assert_eq;
use sessionscan::core::{Address, WinTimestamp};
use sessionscan::memory::AddressSpace;
use sessionscan::process::ProcessRecord;
use sessionscan::profile::Profile;
use sessionscan::session::{ProfileSessionFactory, SessionNotFound, SessionSpaceLocator};
use std::sync::Arc;

const SESSION_1: u64 = 0x4000;
const SESSION_2: u64 = 0x5000;

/// Identity space holding session headers for ids 1 and 2
fn discovery_space() -> Arc<dyn AddressSpace> {
    let mut builder = SnapshotBuilder::new(0x6000, Profile::win7_sp1_x64());
    builder.place_session(SESSION_1, 1, 0xA000, 0xB000);
    builder.place_session(SESSION_2, 2, 0xC000, 0xD000);
    builder.physical_space()
}

fn record(
    pid: u64,
    session_id: Option<u32>,
    session_object: u64,
    space: Option<Arc<dyn AddressSpace>>,
) -> ProcessRecord {
    ProcessRecord::with_details(
        pid,
        format!("proc{pid}.exe"),
        WinTimestamp::new(0),
        Address::new(0x10_0000 + pid * 0x1000),
        session_id,
        Address::new(session_object),
        space,
    )
}

fn factory() -> ProfileSessionFactory {
    ProfileSessionFactory::new(Profile::win7_sp1_x64(), 64)
}

#[test]
fn duplicate_identifiers_construct_exactly_one_session_each() {
    let space = discovery_space();
    let records = vec![
        record(10, Some(1), SESSION_1, Some(space.clone())),
        record(11, Some(1), SESSION_1, Some(space.clone())),
        record(12, Some(2), SESSION_2, Some(space.clone())),
        record(13, None, 0, Some(space.clone())),
        record(14, Some(2), SESSION_2, Some(space)),
    ];
    let locator = SessionSpaceLocator::new(&records, factory());

    let ids: Vec<u32> = locator.enumerate().map(|s| s.session_id()).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn later_translatable_process_anchors_the_session() {
    let space = discovery_space();
    let records = vec![
        record(10, Some(1), SESSION_1, None),
        record(11, Some(1), SESSION_1, Some(space)),
    ];
    let locator = SessionSpaceLocator::new(&records, factory());

    let sessions: Vec<_> = locator.enumerate().collect();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].session_id(), 1);
    assert_eq!(sessions[0].offset(), Address::new(SESSION_1));
}

#[test]
fn find_returns_not_found_with_requested_identifier() {
    let space = discovery_space();
    let records = vec![
        record(10, Some(1), SESSION_1, Some(space.clone())),
        record(11, Some(2), SESSION_2, Some(space)),
    ];
    let locator = SessionSpaceLocator::new(&records, factory());

    assert_eq!(locator.find(1).unwrap().offset(), Address::new(SESSION_1));
    assert_eq!(
        locator.find(99).unwrap_err(),
        SessionNotFound { session_id: 99 }
    );
}

#[test]
fn independent_passes_yield_equal_sequences() {
    let space = discovery_space();
    let records = vec![
        record(10, Some(2), SESSION_2, Some(space.clone())),
        record(11, Some(1), SESSION_1, Some(space.clone())),
        record(12, Some(2), SESSION_2, Some(space)),
    ];
    let locator = SessionSpaceLocator::new(&records, factory());

    let first: Vec<u32> = locator.enumerate().map(|s| s.session_id()).collect();
    let second: Vec<u32> = locator.enumerate().map(|s| s.session_id()).collect();
    assert_eq!(first, vec![2, 1]);
    assert_eq!(first, second);
}

#[test]
fn processes_without_a_session_never_construct_one() {
    let space = discovery_space();
    let records = vec![record(10, None, SESSION_1, Some(space))];
    let locator = SessionSpaceLocator::new(&records, factory());
    assert_eq!(locator.enumerate().count(), 0);
}

#[test]
fn zero_session_identifier_is_treated_as_absent() {
    let space = discovery_space();
    let records = vec![
        record(10, Some(0), SESSION_1, Some(space.clone())),
        record(11, Some(1), SESSION_1, Some(space)),
    ];
    let locator = SessionSpaceLocator::new(&records, factory());

    let ids: Vec<u32> = locator.enumerate().map(|s| s.session_id()).collect();
    assert_eq!(ids, vec![1]);
}

#[test]
fn abandoning_enumeration_early_has_no_side_effects() {
    let space = discovery_space();
    let records = vec![
        record(10, Some(1), SESSION_1, Some(space.clone())),
        record(11, Some(2), SESSION_2, Some(space)),
    ];
    let locator = SessionSpaceLocator::new(&records, factory());

    let first_only: Vec<u32> = locator
        .enumerate()
        .take(1)
        .map(|s| s.session_id())
        .collect();
    assert_eq!(first_only, vec![1]);

    let full: Vec<u32> = locator.enumerate().map(|s| s.session_id()).collect();
    assert_eq!(full, vec![1, 2]);
}
