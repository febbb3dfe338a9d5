//! Virtual-to-physical translation over snapshot images
//!
//! Structures in a kernel snapshot are reachable only through the page
//! tables of some process that mapped them. `Amd64AddressSpace` walks the
//! x86-64 4-level tables rooted at a directory table base captured in the
//! snapshot. Translation never touches the live host; every failure is a
//! recoverable error value.

use crate::core::types::{Address, AnalysisError, AnalysisResult};
use crate::memory::image::SnapshotImage;
use std::fmt;
use std::sync::Arc;

const PAGE_SIZE: u64 = 4096;
const ENTRY_PRESENT: u64 = 1 << 0;
const ENTRY_HUGE: u64 = 1 << 7;
const ENTRY_FRAME_MASK: u64 = 0x0000_FFFF_FFFF_F000;

const SPAN_1G: u64 = 1 << 30;
const SPAN_2M: u64 = 1 << 21;

/// A view over snapshot memory through which structures can be read as if
/// through a given process's memory mapping.
pub trait AddressSpace: fmt::Debug {
    /// Reads `buf.len()` bytes starting at `address` into `buf`.
    fn read_into(&self, address: Address, buf: &mut [u8]) -> AnalysisResult<()>;
}

/// x86-64 long-mode address space rooted at a directory table base.
#[derive(Debug, Clone)]
pub struct Amd64AddressSpace {
    image: Arc<SnapshotImage>,
    dtb: Address,
}

impl Amd64AddressSpace {
    /// Creates an address space over `image` rooted at `dtb`.
    ///
    /// The base must be nonzero, page-aligned, and inside the image; a
    /// process record failing these checks has no usable mapping.
    pub fn new(image: Arc<SnapshotImage>, dtb: Address) -> AnalysisResult<Self> {
        if dtb.is_null() {
            return Err(AnalysisError::untranslatable(dtb, "null directory table base"));
        }
        if !dtb.is_aligned(PAGE_SIZE) {
            return Err(AnalysisError::untranslatable(
                dtb,
                "directory table base not page-aligned",
            ));
        }
        if !image.contains(dtb) {
            return Err(AnalysisError::untranslatable(
                dtb,
                "directory table base outside snapshot",
            ));
        }
        Ok(Amd64AddressSpace { image, dtb })
    }

    pub fn dtb(&self) -> Address {
        self.dtb
    }

    fn read_entry(&self, table: u64, index: u64) -> AnalysisResult<u64> {
        let mut buf = [0u8; 8];
        self.image.read_at(Address::new(table + index * 8), &mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }

    /// Translates one virtual address to its physical offset in the image
    pub fn translate(&self, virt: Address) -> AnalysisResult<Address> {
        let va = virt.as_u64();
        let mut table = self.dtb.as_u64() & ENTRY_FRAME_MASK;

        // PML4 -> PDPT -> PD -> PT, checking the large-page bit where the
        // architecture defines it.
        for (shift, span) in [(39, None), (30, Some(SPAN_1G)), (21, Some(SPAN_2M))] {
            let index = (va >> shift) & 0x1FF;
            let entry = self.read_entry(table, index)?;
            if entry & ENTRY_PRESENT == 0 {
                return Err(AnalysisError::untranslatable(
                    virt,
                    format!("level-{shift} entry not present"),
                ));
            }
            if let Some(span) = span {
                if entry & ENTRY_HUGE != 0 {
                    let frame = entry & ENTRY_FRAME_MASK & !(span - 1);
                    return Ok(Address::new(frame | (va & (span - 1))));
                }
            }
            table = entry & ENTRY_FRAME_MASK;
        }

        let index = (va >> 12) & 0x1FF;
        let entry = self.read_entry(table, index)?;
        if entry & ENTRY_PRESENT == 0 {
            return Err(AnalysisError::untranslatable(virt, "page-table entry not present"));
        }
        Ok(Address::new((entry & ENTRY_FRAME_MASK) | (va & (PAGE_SIZE - 1))))
    }
}

impl AddressSpace for Amd64AddressSpace {
    fn read_into(&self, address: Address, buf: &mut [u8]) -> AnalysisResult<()> {
        // Reads may span page boundaries; translate and copy per page.
        let mut done = 0usize;
        while done < buf.len() {
            let virt = address.offset(done as u64);
            let in_page = (PAGE_SIZE - (virt.as_u64() & (PAGE_SIZE - 1))) as usize;
            let chunk = in_page.min(buf.len() - done);
            let phys = self.translate(virt)?;
            self.image.read_at(phys, &mut buf[done..done + chunk])?;
            done += chunk;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_u64(data: &mut [u8], offset: usize, value: u64) {
        data[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
    }

    /// 64 KiB image with PML4 @ 0x1000, PDPT @ 0x2000, PD @ 0x3000,
    /// PT @ 0x4000, and two data pages @ 0x5000/0x6000 mapped at
    /// virtual 0x1000/0x2000.
    fn small_pages_image() -> Arc<SnapshotImage> {
        let mut data = vec![0u8; 0x10000];
        write_u64(&mut data, 0x1000, 0x2000 | ENTRY_PRESENT);
        write_u64(&mut data, 0x2000, 0x3000 | ENTRY_PRESENT);
        write_u64(&mut data, 0x3000, 0x4000 | ENTRY_PRESENT);
        write_u64(&mut data, 0x4000 + 8, 0x5000 | ENTRY_PRESENT);
        write_u64(&mut data, 0x4000 + 16, 0x6000 | ENTRY_PRESENT);
        for i in 0..0x2000usize {
            data[0x5000 + i] = (i % 251) as u8;
        }
        Arc::new(SnapshotImage::from_bytes(data))
    }

    #[test]
    fn test_rejects_bad_dtb() {
        let image = small_pages_image();
        assert!(Amd64AddressSpace::new(image.clone(), Address::null()).is_err());
        assert!(Amd64AddressSpace::new(image.clone(), Address::new(0x1001)).is_err());
        assert!(Amd64AddressSpace::new(image, Address::new(0x100000)).is_err());
    }

    #[test]
    fn test_translate_4k_page() {
        let space = Amd64AddressSpace::new(small_pages_image(), Address::new(0x1000)).unwrap();
        assert_eq!(
            space.translate(Address::new(0x1234)).unwrap(),
            Address::new(0x5234)
        );
    }

    #[test]
    fn test_not_present_is_untranslatable() {
        let space = Amd64AddressSpace::new(small_pages_image(), Address::new(0x1000)).unwrap();
        let err = space.translate(Address::new(0x4000)).unwrap_err();
        assert!(matches!(err, AnalysisError::TranslationUnavailable { .. }));
    }

    #[test]
    fn test_read_across_page_boundary() {
        let space = Amd64AddressSpace::new(small_pages_image(), Address::new(0x1000)).unwrap();

        let mut crossing = [0u8; 16];
        space
            .read_into(Address::new(0x1FF8), &mut crossing)
            .unwrap();

        let mut low = [0u8; 8];
        let mut high = [0u8; 8];
        space.read_into(Address::new(0x1FF8), &mut low).unwrap();
        space.read_into(Address::new(0x2000), &mut high).unwrap();

        assert_eq!(&crossing[..8], &low);
        assert_eq!(&crossing[8..], &high);
    }

    #[test]
    fn test_translate_2m_page() {
        // PD[1] maps virtual [0x200000, 0x400000) as one large page onto
        // the same physical range.
        let mut data = vec![0u8; 0x400000];
        write_u64(&mut data, 0x1000, 0x2000 | ENTRY_PRESENT);
        write_u64(&mut data, 0x2000, 0x3000 | ENTRY_PRESENT);
        write_u64(&mut data, 0x3000 + 8, 0x200000 | ENTRY_PRESENT | ENTRY_HUGE);
        data[0x234567] = 0x5A;
        let image = Arc::new(SnapshotImage::from_bytes(data));

        let space = Amd64AddressSpace::new(image, Address::new(0x1000)).unwrap();
        assert_eq!(
            space.translate(Address::new(0x234567)).unwrap(),
            Address::new(0x234567)
        );
        let mut buf = [0u8; 1];
        space.read_into(Address::new(0x234567), &mut buf).unwrap();
        assert_eq!(buf[0], 0x5A);
    }
}
