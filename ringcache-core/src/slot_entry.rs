/// Internal wrapper that records which ring slot currently holds a value.
///
/// Every resident key maps to a `SlotEntry`. The slot index is assigned when
/// the key is first inserted and never changes while the key stays resident:
/// updating the value of an existing key keeps its slot, so updates do not
/// postpone eviction.
///
/// # Type Parameters
///
/// * `V` - The type of the cached value
///
/// # Fields
///
/// * `value` - The actual cached value
/// * `slot` - Ring position (`0..capacity`) occupied by the key
///
/// # Examples
///
/// ```
/// use ringcache_core::SlotEntry;
///
/// let mut entry = SlotEntry::new("first", 2);
/// assert_eq!(entry.value, "first");
/// assert_eq!(entry.slot, 2);
///
/// entry.replace("second");
/// assert_eq!(entry.value, "second");
/// assert_eq!(entry.slot, 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SlotEntry<V> {
    pub value: V,
    pub slot: usize,
}

impl<V> SlotEntry<V> {
    /// Creates a new entry bound to `slot`.
    pub fn new(value: V, slot: usize) -> Self {
        Self { value, slot }
    }

    /// Replaces the value in place, keeping the slot.
    ///
    /// Returns the previous value.
    pub fn replace(&mut self, value: V) -> V {
        std::mem::replace(&mut self.value, value)
    }
}
