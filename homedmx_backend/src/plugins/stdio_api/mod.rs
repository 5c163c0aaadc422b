use log::{debug, error, info};
use tokio::{
	io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader},
	sync::mpsc,
	task::JoinHandle,
};

use crate::{
	api_utilities::{handle_command, JSONCommand, JSONResponse},
	plugins::patcher::PatcherInterface,
};

/// Serves the JSON API on stdin/stdout until stdin closes
pub fn initialize(patcher: PatcherInterface) -> JoinHandle<()> {
	return tokio::spawn(serve(patcher, BufReader::new(io::stdin()), io::stdout()));
}

/// Reads one command per line from `input` and writes one response per line to `output`
pub async fn serve<R, W>(patcher: PatcherInterface, input: R, mut output: W)
where
	R: AsyncBufRead + Unpin + Send + 'static,
	W: AsyncWrite + Unpin,
{
	let (response_sender, mut response_receiver) = mpsc::unbounded_channel::<JSONResponse>();

	// Receiver
	let receiver = tokio::spawn(async move {
		let mut lines = input.lines();
		loop {
			match lines.next_line().await {
				Ok(Some(line)) => {
					if line.trim().is_empty() {
						continue;
					}
					match serde_json::from_str::<JSONCommand>(&line) {
						Ok(command) => {
							if response_sender.send(handle_command(&patcher, command)).is_err() {
								break;
							}
						},
						Err(err) => debug!("Discarded unrecognized command ({}): {}", err, line),
					}
				},
				Ok(None) => break,
				Err(err) => {
					error!("Could not read from stdin: {}", err);
					break;
				},
			}
		}
		info!("API host on stdio stopped.");
	});

	// Responder
	while let Some(message) = response_receiver.recv().await {
		match serde_json::to_vec(&message) {
			Ok(mut data) => {
				data.push(b'\n');
				if let Err(err) = write_line(&mut output, &data).await {
					error!("Could not write to stdout: {}", err);
					break;
				}
			},
			Err(err) => error!("Could not serialize response: {}", err),
		}
	}

	receiver.abort();
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, data: &[u8]) -> io::Result<()> {
	output.write_all(data).await?;
	return output.flush().await;
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::plugins::patcher::{FixtureKind, PatcherContext, PropertyValue};

	#[test_log::test(tokio::test)]
	async fn answers_each_line() {
		let mut patcher_ctx = PatcherContext::new();
		patcher_ctx.patch(FixtureKind::LedBar, "Bar", 1).unwrap();
		let patcher = PatcherInterface::new(patcher_ctx);

		let input = concat!(
			"{\"type\":\"SetProperty\",\"fixture\":\"Bar\",\"property\":\"on\",\"value\":true}\n",
			"not json\n",
			"\n",
			"{\"type\":\"GetProperty\",\"fixture\":\"Bar\",\"property\":\"on\"}\n",
		);
		let mut output = Vec::new();
		serve(patcher.clone(), BufReader::new(input.as_bytes()), &mut output).await;

		let output = String::from_utf8(output).unwrap();
		let lines: Vec<&str> = output.lines().collect();
		assert_eq!(lines, vec![
			r#"{"type":"Ok"}"#,
			r#"{"type":"Property","fixture":"Bar","property":"on","value":true}"#,
		]);
		assert_eq!(patcher.fixture("Bar").unwrap().get("on"), Ok(PropertyValue::Bool(true)));
	}
}
