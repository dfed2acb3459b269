//! Property tests for classification and per-packet filtering.

use proptest::prelude::*;

use rawpoint::usage::{GD_WHEEL, GD_X, GD_Y, PAGE_BUTTON, PAGE_GENERIC_DESKTOP};
use rawpoint::{
    classify, is_pointer_channel, ButtonState, ChannelType, Fixed, InputChannel, Packet, ReportInterpreter,
};

fn channel_type() -> impl Strategy<Value = ChannelType> {
    prop_oneof![
        Just(ChannelType::Collection),
        Just(ChannelType::Button),
        Just(ChannelType::Axis),
        Just(ChannelType::Misc),
    ]
}

fn usage_page() -> impl Strategy<Value = u16> {
    prop_oneof![
        Just(PAGE_GENERIC_DESKTOP),
        Just(PAGE_BUTTON),
        Just(0x07u16),
        Just(0x0Cu16),
        any::<u16>(),
    ]
}

fn usage() -> impl Strategy<Value = u32> {
    prop_oneof![
        Just(0u32),
        Just(GD_X),
        Just(GD_Y),
        Just(GD_WHEEL),
        1u32..=40,
        any::<u32>(),
    ]
}

prop_compose! {
    fn any_channel()(
        channel_type in channel_type(),
        usage_page in usage_page(),
        usage in usage(),
        report_id in 0u8..4,
        value in -127i32..=127,
        timestamp in 0u64..4,
    ) -> InputChannel {
        let mut ch = InputChannel::new(channel_type, usage_page, usage, report_id);
        ch.set_sample(value, timestamp);
        ch
    }
}

proptest! {
    #[test]
    fn collections_and_usage_zero_never_classified(channels in prop::collection::vec(any_channel(), 0..32)) {
        let set = classify(channels);
        for ch in set.iter() {
            prop_assert!(!ch.is_collection());
            prop_assert_ne!(ch.usage, 0);
        }
    }

    #[test]
    fn acceptance_matches_policy(channels in prop::collection::vec(any_channel(), 0..32)) {
        let expected: Vec<InputChannel> = channels
            .iter()
            .filter(|c| {
                !c.is_collection()
                    && c.usage != 0
                    && match c.usage_page {
                        PAGE_BUTTON => true,
                        PAGE_GENERIC_DESKTOP => c.usage == GD_X || c.usage == GD_Y || c.usage == GD_WHEEL,
                        _ => false,
                    }
            })
            .cloned()
            .collect();

        let set = classify(channels.clone());
        prop_assert_eq!(set.found(), !expected.is_empty());
        prop_assert_eq!(&set.iter().cloned().collect::<Vec<_>>(), &expected);
        for ch in &channels {
            prop_assert_eq!(is_pointer_channel(ch), expected.contains(ch));
        }
    }

    #[test]
    fn stale_or_foreign_channels_contribute_nothing(
        channels in prop::collection::vec(any_channel(), 0..32),
        timestamp in 0u64..4,
        report_id in 0u8..4,
        prior in any::<u32>(),
    ) {
        let interpreter = ReportInterpreter::default();
        let packet = Packet::new(timestamp, report_id);

        // Only keep channels that do NOT match the packet.
        let unmatched: Vec<InputChannel> = channels
            .into_iter()
            .filter(|c| !packet.matches(c))
            .collect();
        let set = classify(unmatched);
        let out = interpreter.interpret(packet, &set, ButtonState(prior));

        prop_assert_eq!(out.pointer.dx, Fixed::ZERO);
        prop_assert_eq!(out.pointer.dy, Fixed::ZERO);
        prop_assert_eq!(out.scroll.vertical, Fixed::ZERO);
        prop_assert_eq!(out.buttons, ButtonState(prior));
        prop_assert_eq!(out.pointer.buttons, ButtonState(prior));
    }

    #[test]
    fn only_reported_buttons_change(
        prior in any::<u32>(),
        number in 1u32..=32,
        value in -1i32..=1,
    ) {
        let mut set = classify(vec![InputChannel::button(number, 0)]);
        for ch in set.iter_mut() {
            ch.set_sample(value, 1);
        }

        let out = ReportInterpreter::default().interpret(Packet::new(1, 0), &set, ButtonState(prior));

        let bit = 1u32 << (number - 1);
        prop_assert_eq!(out.buttons.bits() & !bit, prior & !bit);
        prop_assert_eq!(out.buttons.bits() & bit != 0, value != 0);
    }

    #[test]
    fn motion_is_a_fixed_shift(x in -32_767i32..=32_767, y in -32_767i32..=32_767) {
        let mut set = classify(vec![InputChannel::axis(GD_X, 0), InputChannel::axis(GD_Y, 0)]);
        let mut values = [x, y].into_iter();
        for ch in set.iter_mut() {
            ch.set_sample(values.next().unwrap(), 3);
        }

        let out = ReportInterpreter::default().interpret(Packet::new(3, 0), &set, ButtonState::NONE);

        prop_assert_eq!(out.pointer.dx.raw(), x << 15);
        prop_assert_eq!(out.pointer.dy.raw(), y << 15);
    }
}
