use chip8vm::{Chip8, Config};
use proptest::prelude::*;

fn boot(code: &[u8]) -> Chip8 {
    let mut chip8 = Chip8::with_config(Config::default().with_seed(7));
    chip8.load(code).unwrap();
    chip8
}

fn lit(chip8: &Chip8) -> usize {
    chip8.display().iter().filter(|&&p| p == 1).count()
}

proptest! {
    #[test]
    fn add_immediate_wraps_without_flag(v in any::<u8>(), kk in any::<u8>(), flag in any::<u8>()) {
        let mut chip8 = boot(&[0x6A, v, 0x6F, flag, 0x7A, kk]);
        chip8.run(3).unwrap();
        prop_assert_eq!(chip8.registers()[0xA], v.wrapping_add(kk));
        prop_assert_eq!(chip8.registers()[0xF], flag);
    }

    #[test]
    fn add_registers_flags_carry(a in any::<u8>(), b in any::<u8>()) {
        let mut chip8 = boot(&[0x6A, a, 0x6B, b, 0x8A, 0xB4]);
        chip8.run(3).unwrap();
        prop_assert_eq!(chip8.registers()[0xA], a.wrapping_add(b));
        prop_assert_eq!(chip8.registers()[0xF], (a as u16 + b as u16 > 255) as u8);
    }

    #[test]
    fn sub_registers_flags_no_borrow(a in any::<u8>(), b in any::<u8>()) {
        let mut chip8 = boot(&[0x6A, a, 0x6B, b, 0x8A, 0xB5]);
        chip8.run(3).unwrap();
        prop_assert_eq!(chip8.registers()[0xA], a.wrapping_sub(b));
        prop_assert_eq!(chip8.registers()[0xF], (a > b) as u8);
    }

    #[test]
    fn bcd_digits_rebuild_value(v in any::<u8>()) {
        let mut chip8 = boot(&[0xA3, 0x00, 0x6A, v, 0xFA, 0x33]);
        chip8.run(3).unwrap();
        let digits = &chip8.memory()[0x300..0x303];
        prop_assert!(digits.iter().all(|&d| d < 10));
        prop_assert_eq!(digits[0] as u16 * 100 + digits[1] as u16 * 10 + digits[2] as u16, v as u16);
    }

    #[test]
    fn glyph_points_into_font(v in any::<u8>()) {
        let mut chip8 = boot(&[0x6A, v, 0xFA, 0x29]);
        chip8.run(2).unwrap();
        prop_assert_eq!(chip8.index(), 0x50 + (v & 0x0F) as u16 * 5);
    }

    #[test]
    fn skip_equal_advances_by_four_or_two(v in any::<u8>(), kk in any::<u8>()) {
        let mut chip8 = boot(&[0x6A, v, 0x3A, kk]);
        chip8.run(2).unwrap();
        let expected = if v == kk { 0x206 } else { 0x204 };
        prop_assert_eq!(chip8.pc(), expected);
    }

    #[test]
    fn drawing_twice_restores_screen(
        x in any::<u8>(),
        y in any::<u8>(),
        sprite in prop::collection::vec(any::<u8>(), 1..=15),
    ) {
        let n = sprite.len() as u8;
        let mut code = vec![
            0x6A, x, // VA = x
            0x6B, y, // VB = y
            0xA2, 0x0C, // I = sprite
            0xDA, 0xB0 | n, // draw
            0xDA, 0xB0 | n, // draw again
            0x00, 0x00,
        ];
        code.extend_from_slice(&sprite);
        let mut chip8 = boot(&code);

        chip8.run(4).unwrap();
        prop_assert_eq!(chip8.registers()[0xF], 0);
        let drawn = lit(&chip8);
        prop_assert!(drawn <= sprite.iter().map(|b| b.count_ones() as usize).sum::<usize>());

        chip8.cycle().unwrap();
        prop_assert_eq!(lit(&chip8), 0);
        prop_assert_eq!(chip8.registers()[0xF], (drawn > 0) as u8);
    }

    #[test]
    fn timers_never_go_below_zero(v in any::<u8>(), ticks in 0usize..600) {
        let mut chip8 = boot(&[0x6A, v, 0xFA, 0x15, 0xFA, 0x18]);
        chip8.run(3).unwrap();
        for _ in 0..ticks {
            chip8.tick_timers();
        }
        let expected = (v as usize).saturating_sub(ticks) as u8;
        prop_assert_eq!(chip8.delay_timer(), expected);
        prop_assert_eq!(chip8.sound_timer(), expected);
    }
}

#[test]
fn wait_for_key_spins_until_pressed() {
    let mut chip8 = boot(&[0xF3, 0x0A]);
    for _ in 0..100 {
        chip8.cycle().unwrap();
        assert_eq!(chip8.pc(), 0x200);
    }
    chip8.set_key(0x4, true).unwrap();
    chip8.cycle().unwrap();
    assert_eq!(chip8.registers()[3], 0x4);
    assert_eq!(chip8.pc(), 0x202);
}
