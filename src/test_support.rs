use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::rc::Rc;

use serde_json::Value;

/// Outbox that tests can read back after handing a clone to a host.
#[derive(Clone, Default)]
pub struct SharedSink(Rc<RefCell<Vec<u8>>>);

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedSink {
    /// Every forwarded message, parsed.
    pub fn lines(&self) -> Vec<Value> {
        String::from_utf8(self.0.borrow().clone())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    pub fn methods(&self) -> Vec<String> {
        self.lines().iter().map(|line| line["method"].as_str().unwrap().to_string()).collect()
    }

    /// Payloads of `sendData` calls, decoded from their string form.
    pub fn sent_data(&self) -> Vec<Value> {
        self.lines()
            .iter()
            .filter(|line| line["method"] == "sendData")
            .map(|line| serde_json::from_str(line["params"]["data"].as_str().unwrap()).unwrap())
            .collect()
    }

    pub fn sent_data_of(&self, kind: &str) -> Vec<Value> {
        self.sent_data().into_iter().filter(|data| data["type"] == kind).collect()
    }
}

/// Inbox the test keeps writing to while a host reads from it. Reads
/// report end of input whenever nothing is queued, like a file being
/// appended to.
#[derive(Clone, Default)]
pub struct SharedInbox(Rc<RefCell<VecDeque<u8>>>);

impl Read for SharedInbox {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.borrow_mut().read(buf)
    }
}

impl SharedInbox {
    pub fn push(&self, text: &str) {
        self.0.borrow_mut().extend(text.bytes());
    }

    pub fn reader(&self) -> Box<dyn BufRead> {
        Box::new(BufReader::new(self.clone()))
    }
}
