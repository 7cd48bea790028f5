//! Material index remapping.
//!
//! Per-face material indices coming from content tools are sparse: slots can
//! be empty, indices can point past the declared material array. The remap
//! collapses them into a dense, used-only index space and routes every
//! invalid reference to a single synthetic default slot.

/// Sentinel for a raw index that no face references.
pub(crate) const UNUSED: u32 = u32::MAX;

/// A mapping from raw material indices to dense output indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterialRemap {
    map: Vec<u32>,
    material_count: u32,
    default_slot: Option<u32>,
}

impl MaterialRemap {
    /// Build the remap from per-face raw indices and the declared material
    /// slots (`None` = slot declared but empty).
    ///
    /// Dense indices are assigned in face encounter order. The first face
    /// whose raw index is out of range or points at an empty slot creates
    /// the default slot at whatever dense index is next; later invalid
    /// references reuse it. Raw indices past the declared array grow the
    /// map on demand.
    pub fn build<T>(face_materials: &[u32], materials: &[Option<T>]) -> Self {
        let mut map = vec![UNUSED; materials.len()];
        let mut material_count = 0u32;
        let mut default_slot = None;

        for &raw in face_materials {
            let raw = raw as usize;
            if raw >= map.len() {
                map.resize(raw + 1, UNUSED);
            }

            let present = materials.get(raw).map_or(false, Option::is_some);
            if !present {
                let slot = match default_slot {
                    Some(slot) => slot,
                    None => {
                        let slot = material_count;
                        default_slot = Some(slot);
                        material_count += 1;
                        slot
                    }
                };
                map[raw] = slot;
            } else if map[raw] == UNUSED {
                map[raw] = material_count;
                material_count += 1;
            }
        }

        Self {
            map,
            material_count,
            default_slot,
        }
    }

    /// Number of dense output materials (including the default slot).
    pub fn material_count(&self) -> u32 {
        self.material_count
    }

    /// Dense index of the synthetic default material, if any face needed it.
    pub fn default_slot(&self) -> Option<u32> {
        self.default_slot
    }

    /// Dense index for a raw index, or [`UNUSED`] if no face references it.
    pub(crate) fn slot(&self, raw: u32) -> u32 {
        self.map.get(raw as usize).copied().unwrap_or(UNUSED)
    }

    /// Gather the dense material array: used declared materials cloned into
    /// their remapped slots, `default` cloned into its slot if any face
    /// needed it.
    pub(crate) fn collect<T: Clone>(&self, materials: &[Option<&T>], default: &T) -> Vec<T> {
        let mut slots: Vec<Option<T>> = vec![None; self.material_count as usize];
        for (raw, material) in materials.iter().enumerate() {
            let slot = self.slot(raw as u32);
            if slot == UNUSED || self.default_slot == Some(slot) {
                continue;
            }
            if let Some(material) = material {
                slots[slot as usize] = Some((*material).clone());
            }
        }
        if let Some(slot) = self.default_slot {
            slots[slot as usize] = Some(default.clone());
        }
        debug_assert!(slots.iter().all(Option::is_some));
        slots.into_iter().flatten().collect()
    }
}
