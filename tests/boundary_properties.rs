//! Property tests for boundary decoding
//!
//! Bitboard iteration, pair classification, text marshalling and
//! result-code classification over arbitrary inputs.

use chess_board_controller::boundary::marshaller::{read_text, write_text};
use chess_board_controller::boundary::{MemoryRegion, ProtocolV3, ResultClass, ResultProtocol};
use chess_board_controller::rendering::bitboard::{classify_pair, squares_of, PairClass};
use engine_abi::WasmPtr;
use proptest::prelude::*;

proptest! {
    #[test]
    fn squares_rebuild_the_mask(mask in any::<u64>()) {
        let squares: Vec<u8> = squares_of(mask).map(|sq| sq.index()).collect();

        prop_assert_eq!(squares.len(), mask.count_ones() as usize);
        prop_assert!(squares.windows(2).all(|pair| pair[0] < pair[1]));
        let rebuilt = squares.iter().fold(0u64, |acc, index| acc | 1u64 << index);
        prop_assert_eq!(rebuilt, mask);
    }

    #[test]
    fn pair_classes_match_bits(white in any::<u64>(), black in any::<u64>()) {
        let classes = classify_pair(white, black);
        for index in 0..64u32 {
            let square = chess_board_controller::game::Square::new(index).unwrap();
            let expected = match (white >> index & 1 == 1, black >> index & 1 == 1) {
                (true, true) => PairClass::Both,
                (true, false) => PairClass::OnlyFirst,
                (false, true) => PairClass::OnlySecond,
                (false, false) => PairClass::None,
            };
            prop_assert_eq!(classes.class_of(square), expected);
        }
    }

    #[test]
    fn written_text_is_a_prefix_within_capacity(text in ".{0,80}", capacity in 0u32..64) {
        let mut memory = vec![0u8; 128];
        let region = MemoryRegion::new(WasmPtr(16), capacity);

        let written = write_text(&mut memory, region, &text).unwrap();
        prop_assert!(written <= capacity as usize);
        prop_assert!(text.starts_with(&read_text(&memory, region, written as u32).unwrap()));
        if text.len() <= capacity as usize {
            prop_assert_eq!(written, text.len());
        }
    }

    #[test]
    fn every_code_has_one_meaning(raw in any::<i32>(), capacity in 1u32..1024) {
        let class = ProtocolV3::new(capacity).classify(raw);
        match class {
            ResultClass::Continue => prop_assert_eq!(raw, -1),
            ResultClass::IllegalMove => prop_assert_eq!(raw, -3),
            ResultClass::GameOver { message_len } => {
                prop_assert_eq!(message_len as i32, raw);
                prop_assert!(message_len >= 1 && message_len <= capacity);
            }
            ResultClass::EngineFatal { raw: reported } => {
                prop_assert_eq!(reported, raw);
                prop_assert!(raw != -1 && raw != -3);
                prop_assert!(raw <= 0 || raw as u32 > capacity);
            }
        }
    }
}
