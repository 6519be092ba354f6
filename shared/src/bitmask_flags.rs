use num_traits::{One, PrimInt};

/// Trait implemented by flag enums.
///
/// The enum's discriminant (via `#[repr(u8)]`) is the bit index. The backing integer type is
/// chosen via the associated `Storage`.
pub trait FlagBitmask {
    type Storage: PrimInt;

    fn bit_index(&self) -> u8;

    fn mask(&self) -> Self::Storage {
        // NOTE: `bit_index()` must be < number of bits in `Storage`.
        Self::Storage::one() << (self.bit_index() as usize)
    }
}

/// A plain bitmask container shared by the move codec and the replication dirty mask.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct BitmaskFlags<T: PrimInt> {
    pub bits: T,
}

impl<T: PrimInt> BitmaskFlags<T> {
    pub fn new(bits: T) -> Self {
        Self { bits }
    }

    pub fn add<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits | tag.mask();
    }

    pub fn remove<U: FlagBitmask<Storage = T>>(&mut self, tag: U) {
        self.bits = self.bits & !tag.mask();
    }

    /// Adds or removes `tag` depending on `on`.
    pub fn set<U: FlagBitmask<Storage = T>>(&mut self, tag: U, on: bool) {
        if on {
            self.add(tag);
        } else {
            self.remove(tag);
        }
    }

    pub fn has<U: FlagBitmask<Storage = T>>(&self, tag: U) -> bool {
        (self.bits & tag.mask()) != T::zero()
    }

    pub fn has_any<U: FlagBitmask<Storage = T> + Copy>(&self, tags: &[U]) -> bool {
        if tags.is_empty() {
            return false;
        }
        let combined = tags.iter().fold(T::zero(), |acc, t| acc | t.mask());
        (self.bits & combined) != T::zero()
    }

    pub fn is_empty(&self) -> bool {
        self.bits == T::zero()
    }

    pub fn clear(&mut self) {
        self.bits = T::zero();
    }
}

/// Declare a bitmask-backed enum and implement `FlagBitmask` for it.
///
/// Variants are assigned bit indices in declaration order.
#[macro_export]
macro_rules! define_bitmask_flags {
    ($(#[$meta:meta])* $name:ident, $storage:ty, { $($(#[$vmeta:meta])* $variant:ident),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(u8)]
        pub enum $name {
            $($(#[$vmeta])* $variant),*
        }

        impl $crate::bitmask_flags::FlagBitmask for $name {
            type Storage = $storage;

            fn bit_index(&self) -> u8 {
                *self as u8
            }
        }
    };
}

define_bitmask_flags!(
    /// Bits of the compressed flags byte carried by every saved move.
    ///
    /// The layout is a wire format: bits 0..=3 belong to the base movement model, bits 4..=7
    /// are free for game-specific input. Do not reorder.
    MoveFlag, u8, {
        /// Jump was held for this move.
        JumpPressed,
        /// Crouch intent was set for this move.
        WantsToCrouch,
        Reserved1,
        Reserved2,
        /// Sprint intent. First custom slot.
        Custom0,
        Custom1,
        Custom2,
        Custom3,
    }
);

/// The compressed flags byte sent with each move.
pub type CompressedFlags = BitmaskFlags<u8>;

/// The custom bit carrying the sprint intent.
pub const SPRINT_FLAG: MoveFlag = MoveFlag::Custom0;

define_bitmask_flags!(
    /// Fields of a replicated resource that changed since the last send.
    ReplicatedField, u8, {
        Base,
        Current,
        Max,
        Dead,
        Healable,
    }
);

/// Dirty-field mask of a replication delta.
pub type DirtyFields = BitmaskFlags<u8>;
