use std::time::Duration;

use super::fake_link::FakeLink;
use crate::{EnttecError, EnttecPro, FramingError};

const PARAMETER_REPLY: [u8; 10] = [0x7E, 3, 5, 0, 1, 0, 10, 5, 25, 0xE7];

#[test]
fn negotiates_parameters() {
	let link = FakeLink::new().reply_with(&PARAMETER_REPLY);
	let mut widget = EnttecPro::new(link);

	let parameters = widget.get_widget_parameters().unwrap();
	assert_eq!(parameters.firmware_version, 1);
	assert_eq!(parameters.break_time, 10);
	assert_eq!(parameters.mark_after_break_time, 5);
	assert_eq!(parameters.output_rate_hz, 25);
	assert_eq!(parameters.tick_period(25), Some(Duration::from_millis(40)));

	let link = widget.into_inner();
	assert_eq!(link.written, vec![0x7E, 3, 2, 0, 0, 0, 0xE7]);
	assert_eq!(link.clears, 1);
}

#[test]
fn stale_input_is_flushed_before_the_request() {
	// A stale reply with a different rate must never be read as the answer
	let link = FakeLink::new()
		.with_stale_input(&[0x7E, 3, 5, 0, 1, 0, 10, 5, 40, 0xE7])
		.reply_with(&PARAMETER_REPLY);
	let mut widget = EnttecPro::new(link);

	assert_eq!(widget.get_widget_parameters().unwrap().output_rate_hz, 25);
}

#[test]
fn reply_split_across_reads() {
	let link = FakeLink::new()
		.reply_with(&PARAMETER_REPLY[..3])
		.reply_with(&PARAMETER_REPLY[3..7])
		.reply_with(&PARAMETER_REPLY[7..]);
	let mut widget = EnttecPro::new(link);

	assert_eq!(widget.get_widget_parameters().unwrap().firmware_version, 1);
}

#[test]
fn short_reply_is_a_framing_error() {
	let link = FakeLink::new().reply_with(&[0x7E, 3, 5, 0, 1, 0, 10, 0xE7]);
	let mut widget = EnttecPro::new(link);

	match widget.get_widget_parameters() {
		Err(EnttecError::Framing(FramingError::LengthMismatch { declared, actual })) => {
			assert_eq!(declared, 5);
			assert_eq!(actual, 3);
		}
		other => panic!("expected a framing error, got {:?}", other),
	}
}

#[test]
fn mismatched_label_fails() {
	let link = FakeLink::new().reply_with(&[0x7E, 10, 4, 0, 1, 2, 3, 4, 0xE7]);
	let mut widget = EnttecPro::new(link);

	assert!(matches!(
		widget.get_widget_parameters(),
		Err(EnttecError::UnexpectedLabel { expected: 3, received: 10 }),
	));
}

#[test]
fn silence_is_a_timeout() {
	let mut widget = EnttecPro::new(FakeLink::new());
	assert!(matches!(widget.get_widget_parameters(), Err(EnttecError::Timeout)));
}

#[test]
fn sends_dmx_packet() {
	let mut widget = EnttecPro::new(FakeLink::new());
	let mut packet = [0u8; 513];
	packet[1] = 12;
	packet[512] = 255;

	widget.send_dmx(&packet).unwrap();

	let written = widget.into_inner().written;
	assert_eq!(written.len(), 518);
	assert_eq!(&written[..4], &[0x7E, 6, 0x01, 0x02]);
	assert_eq!(&written[4..517], &packet[..]);
	assert_eq!(written[517], 0xE7);
}

#[test]
fn rejects_malformed_dmx_packet() {
	let mut widget = EnttecPro::new(FakeLink::new());

	assert!(matches!(
		widget.send_dmx(&[0u8; 512]),
		Err(EnttecError::InvalidDmxPacket { length: 512, .. }),
	));

	let mut packet = [0u8; 513];
	packet[0] = 0xCC;
	assert!(matches!(
		widget.send_dmx(&packet),
		Err(EnttecError::InvalidDmxPacket { start_code: 0xCC, .. }),
	));
	assert!(widget.into_inner().written.is_empty());
}

#[test]
fn write_failures_surface_as_io_errors() {
	let mut link = FakeLink::new();
	link.fail_writes = true;
	let mut widget = EnttecPro::new(link);

	assert!(matches!(widget.send_dmx(&[0u8; 513]), Err(EnttecError::Io(_))));
}

#[test]
fn short_reply_completed_by_stray_bytes_is_rejected() {
	// Declares five bytes, carries three, and the next message's bytes fill the gap
	let link = FakeLink::new().reply_with(&[0x7E, 3, 5, 0, 1, 0, 10, 0xE7, 0x7E, 0xE7]);
	let mut widget = EnttecPro::new(link);

	match widget.get_widget_parameters() {
		Err(EnttecError::Framing(FramingError::LengthMismatch { declared, actual })) => {
			assert_eq!(declared, 5);
			assert_eq!(actual, 3);
		}
		other => panic!("expected a framing error, got {:?}", other),
	}
}

#[test_log::test]
fn failed_write_does_not_prefix_the_next_packet() {
	let mut link = FakeLink::new();
	link.write_limit = Some(100);
	let mut widget = EnttecPro::new(link);
	let mut packet = [0u8; 513];
	packet[1] = 42;

	assert!(matches!(widget.send_dmx(&packet), Err(EnttecError::Io(_))));
	let mut link = widget.into_inner();
	assert_eq!(link.output_clears, 1);
	assert!(link.written.is_empty());

	link.write_limit = None;
	let mut widget = EnttecPro::new(link);
	widget.send_dmx(&packet).unwrap();

	let written = widget.into_inner().written;
	assert_eq!(written.len(), 518);
	assert_eq!(&written[..4], &[0x7E, 6, 0x01, 0x02]);
	assert_eq!(written[5], 42);
	assert_eq!(written[517], 0xE7);
}
