//! Field-offset tables for the kernel structures read by the analyzer
//!
//! Offsets are byte distances from the owning structure's base. They vary
//! per Windows build; each supported build contributes one [`super::Profile`].

/// Executive process object (`_EPROCESS`) fields
#[derive(Debug, Clone, Copy)]
pub struct ProcessLayout {
    /// `LIST_ENTRY` linking all active processes
    pub active_links: u64,
    /// `LIST_ENTRY` linking the processes of one session
    pub session_links: u64,
    pub unique_process_id: u64,
    pub create_time: u64,
    pub image_file_name: u64,
    pub image_file_name_len: usize,
    /// Directory table base, inside the embedded kernel process header
    pub directory_table_base: u64,
    /// Pointer to the owning session space
    pub session: u64,
}

/// Session space object (`_MM_SESSION_SPACE`) fields
#[derive(Debug, Clone, Copy)]
pub struct SessionSpaceLayout {
    pub session_id: u64,
    /// `LIST_ENTRY` head of the session's process list
    pub process_list: u64,
    pub paged_pool_start: u64,
    pub paged_pool_end: u64,
    /// `LIST_ENTRY` head of the session's mapped-image list
    pub image_list: u64,
}

/// Session image entry (`_IMAGE_ENTRY_IN_SESSION`) fields
#[derive(Debug, Clone, Copy)]
pub struct SessionImageLayout {
    /// `LIST_ENTRY` chaining image entries
    pub link: u64,
    /// Image load address
    pub address: u64,
}

/// Loaded-module table entry (`_LDR_DATA_TABLE_ENTRY`) fields
#[derive(Debug, Clone, Copy)]
pub struct LoaderEntryLayout {
    pub load_links: u64,
    pub dll_base: u64,
    pub size_of_image: u64,
    /// Counted UTF-16 base name (`UNICODE_STRING`)
    pub base_name: u64,
}

/// Counted string (`_UNICODE_STRING`) fields
#[derive(Debug, Clone, Copy)]
pub struct UnicodeStringLayout {
    pub length: u64,
    pub buffer: u64,
    /// Upper bound on name bytes read, whatever the counted length claims
    pub max_read: usize,
}
