// Layout adapters: three backing-storage strategies for the same logical
// record. The kernels in `normalize` read and write through these, so
// any timing difference between them comes from memory layout alone.

use crate::CACHE_LINE_BYTES;
use crate::dataset::Dataset;

/// Element-wise access to a sequence of 3-component vectors, independent
/// of how the components are stored. Layout must never change logical
/// content: `get(i)` returns the same triple for every backend built
/// from the same dataset.
pub trait VectorStore {
    fn len(&self) -> usize;
    fn get(&self, index: usize) -> [f32; 3];
    fn set(&mut self, index: usize, value: [f32; 3]);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// boxed layout: the deliberate negative case

/// Heap side-object each boxed record drags along, modeling the extra
/// indirection of reference-heavy object graphs. Never read by kernels.
pub struct RecordMeta {
    pub label: String,
    pub revision: i32,
}

pub struct BoxedVector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub meta: Box<RecordMeta>,
}

/// One allocation per record, reached through an array of pointers.
/// No locality guarantee at all; records land wherever the allocator
/// puts them.
pub struct BoxedStore {
    records: Vec<Box<BoxedVector>>,
}

impl BoxedStore {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let records = dataset
            .records()
            .iter()
            .enumerate()
            .map(|(i, &[x, y, z])| {
                Box::new(BoxedVector {
                    x,
                    y,
                    z,
                    meta: Box::new(RecordMeta {
                        label: format!("record-{i}"),
                        revision: 0,
                    }),
                })
            })
            .collect();

        Self { records }
    }
}

impl VectorStore for BoxedStore {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn get(&self, index: usize) -> [f32; 3] {
        let r = &self.records[index];
        [r.x, r.y, r.z]
    }

    fn set(&mut self, index: usize, value: [f32; 3]) {
        let r = &mut self.records[index];
        [r.x, r.y, r.z] = value;
    }
}

// packed inline layouts

/// Inline record that fits one cache line. `repr(C)` keeps the fields in
/// declaration order; without it the compiler is free to reorder and the
/// experiment would measure nothing.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct PackedNarrowRecord {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub tag: i32,
    pub fill: [f64; 5],
    pub live: bool,
}

/// Inline record whose stride crosses a cache-line boundary, so every
/// record straddles two lines.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct PackedWideRecord {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub tag: i32,
    pub fill: [f64; 6],
    pub live: bool,
}

const _: () = assert!(size_of::<PackedNarrowRecord>() <= CACHE_LINE_BYTES);
const _: () = assert!(size_of::<PackedWideRecord>() > CACHE_LINE_BYTES);

macro_rules! packed_store {
    ($store:ident, $record:ident) => {
        /// One contiguous block of inline records with a fixed, explicit
        /// stride.
        pub struct $store {
            records: Vec<$record>,
        }

        impl $store {
            pub fn from_dataset(dataset: &Dataset) -> Self {
                let records = dataset
                    .records()
                    .iter()
                    .map(|&[x, y, z]| $record {
                        x,
                        y,
                        z,
                        tag: 0,
                        fill: Default::default(),
                        live: true,
                    })
                    .collect();

                Self { records }
            }

            pub const fn stride() -> usize {
                size_of::<$record>()
            }
        }

        impl VectorStore for $store {
            fn len(&self) -> usize {
                self.records.len()
            }

            fn get(&self, index: usize) -> [f32; 3] {
                let r = &self.records[index];
                [r.x, r.y, r.z]
            }

            fn set(&mut self, index: usize, value: [f32; 3]) {
                let r = &mut self.records[index];
                [r.x, r.y, r.z] = value;
            }
        }
    };
}

packed_store!(PackedNarrowStore, PackedNarrowRecord);
packed_store!(PackedWideStore, PackedWideRecord);

// columnar layout

/// Structure of arrays: one contiguous primitive array per component,
/// index-aligned. The block and parallel normalize kernels work on the
/// columns directly.
pub struct SoaStore {
    xs: Vec<f32>,
    ys: Vec<f32>,
    zs: Vec<f32>,
}

impl SoaStore {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let n = dataset.len();
        let mut xs = Vec::with_capacity(n);
        let mut ys = Vec::with_capacity(n);
        let mut zs = Vec::with_capacity(n);

        for &[x, y, z] in dataset.records() {
            xs.push(x);
            ys.push(y);
            zs.push(z);
        }

        Self { xs, ys, zs }
    }

    pub fn columns(&self) -> (&[f32], &[f32], &[f32]) {
        (&self.xs, &self.ys, &self.zs)
    }

    pub fn columns_mut(&mut self) -> (&mut [f32], &mut [f32], &mut [f32]) {
        (&mut self.xs, &mut self.ys, &mut self.zs)
    }
}

impl VectorStore for SoaStore {
    fn len(&self) -> usize {
        self.xs.len()
    }

    fn get(&self, index: usize) -> [f32; 3] {
        [self.xs[index], self.ys[index], self.zs[index]]
    }

    fn set(&mut self, index: usize, value: [f32; 3]) {
        self.xs[index] = value[0];
        self.ys[index] = value[1];
        self.zs[index] = value[2];
    }
}
