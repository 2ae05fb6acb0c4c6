//! Integration tests for pointer-chain parsing and resolution

use swsh_executor::pointer::{self, PointerChain};
use swsh_executor::{Address, MockChannel};

const MODULE_BASE: u64 = 0x7100_0000;

#[tokio::test]
async fn test_chain_resolution_matches_hand_walk() {
    let channel = MockChannel::new().with_module_base(MODULE_BASE);
    channel.load_u64(Address::new(MODULE_BASE + 0x100), 0x8000_0000);
    channel.load_u64(Address::new(0x8000_0008), 0x9000_0000);
    channel.load_u64(Address::new(0x9000_0004), 0xA000_0000);

    // Hand walk: read main+0x100 -> A1, A1+0x8 -> A2, A2+0x4 -> A3,
    // then add the 0xC addend without dereferencing.
    let resolved = pointer::resolve_text(&channel, "[[[main+100]+8]+4]+C")
        .await
        .unwrap();
    assert_eq!(resolved, Address::new(0xA000_000C));

    // Exactly three pointer reads, no more.
    assert_eq!(channel.read_count(Address::new(MODULE_BASE + 0x100)), 1);
    assert_eq!(channel.read_count(Address::new(0x8000_0008)), 1);
    assert_eq!(channel.read_count(Address::new(0x9000_0004)), 1);
}

#[tokio::test]
async fn test_empty_chain_is_null_not_error() {
    let channel = MockChannel::new();
    for description in ["", "   ", "[[]]", "main+"] {
        let resolved = pointer::resolve_text(&channel, description).await.unwrap();
        assert!(resolved.is_null(), "{description:?} should resolve to null");
    }
}

#[tokio::test]
async fn test_repeated_offset_still_dereferences() {
    // A chain whose second jump equals the first used to be a correctness
    // trap; with the explicit grammar it walks normally.
    let channel = MockChannel::new().with_module_base(MODULE_BASE);
    channel.load_u64(Address::new(MODULE_BASE + 0x100), 0x8000_0000);
    channel.load_u64(Address::new(0x8000_0100), 0x9000_0000);

    let resolved = pointer::resolve_text(&channel, "[[main+100]+100]+8")
        .await
        .unwrap();
    assert_eq!(resolved, Address::new(0x9000_0008));
}

#[test]
fn test_both_addend_notations_agree() {
    // Trailing-token and bracket conventions describe the same chains.
    let with_addend = PointerChain::parse("[[[main+100]+8]+4]+C").unwrap();
    assert_eq!(with_addend.jumps(), &[0x100, 0x8, 0x4]);
    assert_eq!(with_addend.addend(), 0xC);

    let fully_bracketed = PointerChain::parse("[[[[main+100]+8]+4]+C]").unwrap();
    assert_eq!(fully_bracketed.jumps(), &[0x100, 0x8, 0x4, 0xC]);
    assert_eq!(fully_bracketed.addend(), 0);
}

#[test]
fn test_production_spin_chain_parses() {
    let chain = PointerChain::parse(swsh_executor::offsets::SPIN_COORDINATE_CHAIN).unwrap();
    assert_eq!(chain.jumps().len(), 6);
    assert_eq!(chain.addend(), 0x60);
}
