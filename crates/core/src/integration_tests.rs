//! Integration tests: exercise the full flow using a simulated Model O.
//!
//! These tests register the mouse's answers for every command, then run the
//! read → mutate → write pipeline through the codec, model and protocol
//! modules together.

#[cfg(test)]
mod tests {
    use crate::codec::{self, offsets, CFG_SIZE_USED, CONFIG_REPORT_SIZE};
    use crate::comm::{check_device_status, DeviceStatus};
    use crate::effect::RgbEffect;
    use crate::error::Error;
    use crate::mode::EffectMode;
    use crate::protocol::{self, REPORT_ID_CONFIG};
    use crate::rgb::Rgb8;
    use crate::transport::mock::MockTransport;

    /// Factory-like config image as a Model O would return it.
    fn factory_image() -> Vec<u8> {
        let mut image = vec![0u8; CONFIG_REPORT_SIZE];
        image[offsets::REPORT_ID] = REPORT_ID_CONFIG;
        image[offsets::COMMAND_ID] = 0x11;
        image[offsets::CONFIG_WRITE_LEN] = 0x7B;
        image[offsets::RESERVED_HEADER..offsets::RESERVED_HEADER + 6]
            .copy_from_slice(&[0x00, 0x00, 0x00, 0x06, 0x06, 0x03]);
        image[offsets::CONFIG1] = 0x11;
        image[offsets::DPI_SELECTOR] = 0x26;
        image[offsets::DPI_ENABLED] = 0x3F;
        image[offsets::DPI_CODES..offsets::DPI_CODES + 6].copy_from_slice(&[3, 7, 15, 31, 63, 127]);
        image[offsets::EFFECT_ID] = RgbEffect::Glorious.id();
        image[offsets::GLORIOUS_MODE] = 0x41;
        image[offsets::SINGLE_MODE] = 0x40;
        image[offsets::SINGLE_COLOR..offsets::SINGLE_COLOR + 3].copy_from_slice(&[0xFF, 0x00, 0x00]);
        image[offsets::BREATHING7_COUNT] = 7;
        image[offsets::TAIL_MODE] = 0x42;
        image[offsets::RESERVED_LIGHTING + 10] = 0xA5;
        image[offsets::RAVE_MODE] = 0x42;
        image[offsets::WAVE_MODE] = 0x42;
        image[offsets::BREATHING1_MODE] = 0x42;
        image[offsets::LIFTOFF_DISTANCE] = 0x02;
        image
    }

    /// Create a mock Model O answering every read command.
    fn create_mock_model_o() -> MockTransport {
        let mock = MockTransport::new();
        mock.on_command([0x05, 0x11], factory_image());
        mock.on_command([0x05, 0x01], vec![0x05, 0x01, b'V', b'1', b'2', 0x00]);
        mock.on_command([0x05, 0x1A], vec![0x05, 0x1A, 0x05, 0x00, 0x00, 0x00]);
        mock
    }

    /// The last 520-byte report the mock received.
    fn last_written_image(mock: &MockTransport) -> Vec<u8> {
        mock.sent()
            .into_iter()
            .rev()
            .find(|r| r.len() == CONFIG_REPORT_SIZE)
            .unwrap()
    }

    #[test]
    fn read_modify_write_dpi() {
        let mock = create_mock_model_o();

        let mut cfg = protocol::read_config(&mock).unwrap();
        assert_eq!(cfg.active_profile(), 2);
        assert_eq!(cfg.profile_count(), 6);
        assert_eq!(cfg.dpi(2).unwrap(), 800);

        cfg.set_dpi(2, 1600).unwrap();
        cfg.set_active_profile(3).unwrap();
        protocol::write_config(&mock, &mut cfg).unwrap();

        let written = last_written_image(&mock);
        assert_eq!(written[offsets::DPI_CODES + 1], 15);
        assert_eq!(written[offsets::DPI_SELECTOR], 0x36);
        assert_eq!(written[offsets::CONFIG_WRITE_LEN], 123);
    }

    #[test]
    fn untouched_fields_survive_write() {
        let mock = create_mock_model_o();

        let mut cfg = protocol::read_config(&mock).unwrap();
        cfg.set_liftoff_distance(1);
        protocol::write_config(&mock, &mut cfg).unwrap();

        let original = factory_image();
        let written = last_written_image(&mock);
        for (offset, (&a, &b)) in original[..CFG_SIZE_USED]
            .iter()
            .zip(&written[..CFG_SIZE_USED])
            .enumerate()
        {
            if offset == offsets::LIFTOFF_DISTANCE {
                assert_eq!(b, 1);
            } else {
                assert_eq!(a, b, "byte {offset} changed");
            }
        }
        assert_eq!(written[offsets::RESERVED_LIGHTING + 10], 0xA5);
    }

    #[test]
    fn switch_effect_and_tune_lighting() {
        let mock = create_mock_model_o();

        let mut cfg = protocol::read_config(&mock).unwrap();
        assert_eq!(cfg.effect(), Some(RgbEffect::Glorious));
        assert!(cfg.set_brightness(2).is_err());

        cfg.set_effect(RgbEffect::Single);
        cfg.set_brightness(3).unwrap();
        cfg.set_speed(1).unwrap();
        cfg.set_single_color(Rgb8::new(0x00, 0x80, 0xFF));
        protocol::write_config(&mock, &mut cfg).unwrap();

        let back = codec::decode(&last_written_image(&mock)).unwrap();
        assert_eq!(back.effect(), Some(RgbEffect::Single));
        assert_eq!(
            back.get_mode(RgbEffect::Single).unwrap(),
            EffectMode::new(3, 1)
        );
        assert_eq!(back.single_color(), Rgb8::new(0x00, 0x80, 0xFF));
        // Other effects keep their modes
        assert_eq!(back.get_mode(RgbEffect::Glorious).unwrap(), EffectMode::new(4, 1));
    }

    #[test]
    fn debounce_read_and_write() {
        let mock = create_mock_model_o();

        assert_eq!(protocol::read_debounce(&mock).unwrap(), 10);
        assert_eq!(protocol::write_debounce(&mock, 13).unwrap(), 12);
        assert_eq!(mock.sent().last().unwrap(), &vec![0x05, 0x1A, 6, 0, 0, 0]);
    }

    #[test]
    fn firmware_version_and_status() {
        let mock = create_mock_model_o();
        assert_eq!(protocol::read_firmware_version(&mock).unwrap(), "V12");
        assert_eq!(check_device_status(&mock), DeviceStatus::Connected);
    }

    #[test]
    fn validation_prevents_any_io() {
        let mock = create_mock_model_o();
        let mut cfg = protocol::read_config(&mock).unwrap();
        let before = cfg.clone();
        let sent_before = mock.sent().len();

        assert!(matches!(cfg.set_dpi(1, 150), Err(Error::OutOfRange { .. })));
        assert!(matches!(cfg.set_active_profile(7), Err(Error::OutOfRange { .. })));
        assert!(matches!(cfg.set_speed(9), Err(Error::OutOfRange { .. })));
        assert!(protocol::write_debounce(&mock, 1000).is_err());

        assert_eq!(cfg, before);
        assert_eq!(mock.sent().len(), sent_before);
    }

    #[test]
    fn failed_read_leaves_held_config_intact() {
        let mock = create_mock_model_o();
        let held = protocol::read_config(&mock).unwrap();

        mock.on_command([0x05, 0x11], vec![0x04; 10]);
        let result = protocol::read_config(&mock);
        assert!(result.is_err());
        assert_eq!(held.dpi(2).unwrap(), 800);
    }

    #[test]
    fn transport_failure_aborts_write() {
        let mock = create_mock_model_o();
        let mut cfg = protocol::read_config(&mock).unwrap();
        mock.fail_all("device disconnected");
        let err = protocol::write_config(&mock, &mut cfg).unwrap_err();
        assert!(matches!(err.root(), Error::Hid(_)));
        assert!(err.to_string().contains("write config"));
    }

    #[test]
    fn transport_errors_name_the_operation() {
        let mock = create_mock_model_o();
        mock.fail_all("boom");

        let cases = [
            ("read config", protocol::read_config(&mock).map(|_| ()).unwrap_err()),
            (
                "read firmware version",
                protocol::read_firmware_version(&mock).map(|_| ()).unwrap_err(),
            ),
            ("read debounce", protocol::read_debounce(&mock).map(|_| ()).unwrap_err()),
            ("write debounce", protocol::write_debounce(&mock, 8).map(|_| ()).unwrap_err()),
        ];
        for (operation, err) in cases {
            let text = err.to_string();
            assert!(text.contains(operation), "{text}");
            assert!(text.contains("boom"), "{text}");
        }
    }
}
