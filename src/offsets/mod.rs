//! Memory offset catalog for the supported software version
//!
//! One immutable table of named absolute and module-relative addresses plus
//! the magic comparison values that go with them. Every address a detector or
//! codec touches lives here; nothing else in the crate hard-codes a location.
//!
//! Addresses marked "heap" are absolute within the console's mapped heap and
//! stable for the supported image. Module-relative offsets are resolved by
//! the channel against the running image base.

use crate::core::types::{Address, ConsoleLanguage, GameVariant};

/// Active software identifiers accepted at session start
pub const TITLE_ID_SWORD: &str = "0100ABF008968000";
pub const TITLE_ID_SHIELD: &str = "01008DB008C2C000";

/// Base of box storage (heap)
pub const BOX_START: Address = Address::new(0x45075880);

/// Stored stride of one box slot
pub const SLOT_SIZE: usize = crate::core::types::RECORD_SIZE;

/// Slots per box
pub const BOX_CAPACITY: u32 = 30;

/// Currently opened box index (heap). Read as 1 byte, written as 4 — the
/// surrounding fields tolerate the wide write and the narrow read is all the
/// game checks. An asymmetry of the underlying layout, not ours to fix.
pub const CURRENT_BOX: Address = Address::new(0x450C680E);

/// Trainer data block of the running save (heap)
pub const TRAINER_DATA: Address = Address::new(0x45068F18);
pub const TRAINER_DATA_LEN: usize = crate::core::types::TRAINER_BLOCK_SIZE;

/// Soft-ban penalty timestamp (heap); zero (epoch) means not banned
pub const SOFT_BAN_TIMESTAMP: Address = Address::new(0x450C89E8);

/// Online-service connection flag (heap); 1 while connected
pub const ONLINE_CONNECTED: Address = Address::new(0x30C7CCA8);

/// Text-speed settings byte (heap); speed lives in the low two bits
pub const TEXT_SPEED: Address = Address::new(0x450690A0);

/// Partner record staged during a surprise trade (heap)
pub const SURPRISE_TRADE_PARTNER: Address = Address::new(0x450A6098);

/// 4-byte screen id used by raw screen detection (heap)
pub const CURRENT_SCREEN: Address = Address::new(0x6B30FA00);

/// Overworld screen ids; two values occur depending on transition direction
pub const SCREEN_OVERWORLD_FADE: u32 = 0xFFFF_5127;
pub const SCREEN_OVERWORLD_MENU: u32 = 0xFFFF_9963;

/// Box screen ids; the second value shows while the cursor holds a record
pub const SCREEN_BOX_VIEW: u32 = 0xFF00_D59B;
pub const SCREEN_BOX_HOLDING: u32 = 0xFF09_62DD;

/// Pointer chain locating the avatar coordinate block for spin correction
pub const SPIN_COORDINATE_CHAIN: &str = "[[[[[[main+26365B8]+88]+1F8]+E0]+10]+E0]+60";

/// Per-variant in-battle probe: 1-byte address and expected value.
///
/// The flag moved two bytes and changed value between the two variants, so
/// the pair is resolved once at session start instead of branching inline on
/// every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleProbe {
    pub address: Address,
    pub match_value: u8,
}

/// Resolves the in-battle probe for a software variant
pub fn battle_probe(variant: GameVariant) -> BattleProbe {
    match variant {
        GameVariant::Sword => BattleProbe {
            address: Address::new(0x3F128624),
            match_value: 0x41,
        },
        GameVariant::Shield => BattleProbe {
            address: Address::new(0x3F128626),
            match_value: 0x40,
        },
    }
}

/// Address of the 1-byte overworld flag for a console language.
///
/// The flag trails language-dependent UI state, so each language gets its
/// own slot. Latin-script languages share one address.
pub fn overworld_flag(language: ConsoleLanguage) -> Address {
    use ConsoleLanguage::*;
    match language {
        English | French | German | Spanish | Italian | Dutch | Portuguese => {
            Address::new(0x3F128626)
        }
        Russian => Address::new(0x3F128628),
        Japanese => Address::new(0x3F128606),
        ChineseSimplified | ChineseTraditional => Address::new(0x3F128322),
        Korean => Address::new(0x3F128316),
    }
}
