//! Structure layout profiles for supported Windows builds
//!
//! A profile is the compiled-in knowledge of where the fields of the kernel
//! structures live for one build. Nothing here reads memory; profiles are
//! pure data consumed by the process, session, and module walkers.

mod layouts;

pub use layouts::{
    LoaderEntryLayout, ProcessLayout, SessionImageLayout, SessionSpaceLayout, UnicodeStringLayout,
};

use lazy_static::lazy_static;
use std::collections::BTreeMap;

/// Layouts for one Windows build
#[derive(Debug, Clone, Copy)]
pub struct Profile {
    pub name: &'static str,
    pub process: ProcessLayout,
    pub session_space: SessionSpaceLayout,
    pub session_image: SessionImageLayout,
    pub loader_entry: LoaderEntryLayout,
    pub unicode_string: UnicodeStringLayout,
}

impl Profile {
    /// Windows 7 SP1 x64
    pub const fn win7_sp1_x64() -> Self {
        Profile {
            name: "win7-sp1-x64",
            process: ProcessLayout {
                active_links: 0x188,
                session_links: 0x290,
                unique_process_id: 0x180,
                create_time: 0x168,
                image_file_name: 0x2e0,
                image_file_name_len: 15,
                directory_table_base: 0x28,
                session: 0x2d8,
            },
            session_space: SessionSpaceLayout {
                session_id: 0x8,
                process_list: 0x10,
                paged_pool_start: 0x1b8,
                paged_pool_end: 0x1c0,
                image_list: 0x140,
            },
            session_image: SessionImageLayout {
                link: 0x0,
                address: 0x10,
            },
            loader_entry: LoaderEntryLayout {
                load_links: 0x0,
                dll_base: 0x30,
                size_of_image: 0x40,
                base_name: 0x58,
            },
            unicode_string: UnicodeStringLayout {
                length: 0x0,
                buffer: 0x8,
                max_read: 512,
            },
        }
    }

    /// Windows 10 1809 x64
    pub const fn win10_1809_x64() -> Self {
        Profile {
            name: "win10-1809-x64",
            process: ProcessLayout {
                active_links: 0x2e8,
                session_links: 0x3a8,
                unique_process_id: 0x2e0,
                create_time: 0x2f0,
                image_file_name: 0x450,
                image_file_name_len: 15,
                directory_table_base: 0x28,
                session: 0x430,
            },
            session_space: SessionSpaceLayout {
                session_id: 0x8,
                process_list: 0x10,
                paged_pool_start: 0x268,
                paged_pool_end: 0x270,
                image_list: 0x198,
            },
            session_image: SessionImageLayout {
                link: 0x0,
                address: 0x10,
            },
            loader_entry: LoaderEntryLayout {
                load_links: 0x0,
                dll_base: 0x30,
                size_of_image: 0x40,
                base_name: 0x58,
            },
            unicode_string: UnicodeStringLayout {
                length: 0x0,
                buffer: 0x8,
                max_read: 512,
            },
        }
    }

    /// Looks up a profile by its registry name
    pub fn by_name(name: &str) -> Option<Profile> {
        PROFILES.get(name).copied()
    }

    /// Names of all supported profiles, sorted
    pub fn names() -> Vec<&'static str> {
        PROFILES.keys().copied().collect()
    }
}

lazy_static! {
    static ref PROFILES: BTreeMap<&'static str, Profile> = {
        let mut map = BTreeMap::new();
        for profile in [Profile::win7_sp1_x64(), Profile::win10_1809_x64()] {
            map.insert(profile.name, profile);
        }
        map
    };
}
