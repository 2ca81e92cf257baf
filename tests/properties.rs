use chip8_vm::{
    create_state, execute_cycle, execute_opcode, load_rom_bytes, EmulatorState, Instruction,
    VmConfig,
};
use proptest::prelude::*;

fn fresh_state() -> EmulatorState {
    create_state(None, &VmConfig::default().with_seed(1)).unwrap()
}

proptest! {
    #[test]
    fn call_then_return_restores_pc_and_depth(target in 0x202u16..0xFFE) {
        let target = target & !1;
        let mut state = fresh_state();
        let call = 0x2000 | target;
        load_rom_bytes(&mut state, &call.to_be_bytes()).unwrap();
        state.memory.load(target as usize, &[0x00, 0xEE]).unwrap();
        let depth = state.stack.depth();

        execute_cycle(&mut state, &VmConfig::default()).unwrap();
        prop_assert_eq!(state.registers.pc, target);
        execute_cycle(&mut state, &VmConfig::default()).unwrap();

        prop_assert_eq!(state.registers.pc, 0x202);
        prop_assert_eq!(state.stack.depth(), depth);
    }

    #[test]
    fn add_byte_wraps_and_leaves_vf_alone(x in 0usize..15, start in any::<u8>(), kk in any::<u8>()) {
        let mut state = fresh_state();
        state.registers.v[x] = start;
        state.registers.v[0xF] = 0x5A;

        execute_opcode(&mut state, 0x7000 | ((x as u16) << 8) | kk as u16, &VmConfig::default()).unwrap();

        prop_assert_eq!(state.registers.v[x], start.wrapping_add(kk));
        prop_assert_eq!(state.registers.v[0xF], 0x5A);
    }

    #[test]
    fn decode_is_pure(opcode in any::<u16>()) {
        let first = Instruction::decode(opcode).ok();
        let second = Instruction::decode(opcode).ok();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn non_control_flow_opcodes_advance_pc_by_two(x in 0usize..16, kk in any::<u8>()) {
        let mut state = fresh_state();
        // LD Vx, kk
        let opcode = 0x6000 | ((x as u16) << 8) | kk as u16;
        load_rom_bytes(&mut state, &opcode.to_be_bytes()).unwrap();

        execute_cycle(&mut state, &VmConfig::default()).unwrap();

        prop_assert_eq!(state.registers.pc, 0x202);
        prop_assert_eq!(state.registers.v[x], kk);
    }

    #[test]
    fn drawing_a_sprite_twice_restores_the_screen(
        vx in any::<u8>(),
        vy in any::<u8>(),
        rows in proptest::collection::vec(any::<u8>(), 1..16),
    ) {
        let mut state = fresh_state();
        state.registers.v[1] = vx;
        state.registers.v[2] = vy;
        state.memory.load(0x300, &rows).unwrap();
        state.registers.i = 0x300;
        let opcode = 0xD120 | rows.len() as u16;
        let before = state.display.clone();

        execute_opcode(&mut state, opcode, &VmConfig::default()).unwrap();
        execute_opcode(&mut state, opcode, &VmConfig::default()).unwrap();

        prop_assert_eq!(&state.display, &before);
        let any_lit = rows.iter().any(|row| *row != 0);
        prop_assert_eq!(state.registers.v[0xF], u8::from(any_lit));
    }
}
