// Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
// SPDX-License-Identifier: Apache-2.0

use std::fs::File;
use std::io::{Stderr, Stdout, Write};

use crate::engine::errors::Error;
use crate::engine::Result;

/// Output sink for commands: regular output goes to `buffer`, diagnostics
/// go to `err`. Tests use in-memory buffers for both.
pub struct Writer {
    buffer: WriteBuffer,
    err: WriteBuffer,
}

impl Default for Writer {
    fn default() -> Self {
        Writer::new(WriteBuffer::Vec(vec![]), WriteBuffer::Vec(vec![]))
    }
}

impl Writer {
    pub fn new(buffer: WriteBuffer, err: WriteBuffer) -> Self {
        Self { buffer, err }
    }

    pub fn write_err(&mut self, message: String) -> std::io::Result<()> {
        writeln!(self.err, "{message}")
    }

    pub fn into_string(self) -> Result<String> {
        self.buffer.into_string()
    }

    pub fn err_to_string(self) -> Result<String> {
        self.err.into_string()
    }

    /// Output with any terminal colouring removed.
    pub fn stripped(self) -> Result<String> {
        self.buffer.stripped()
    }

    pub fn err_stripped(self) -> Result<String> {
        self.err.stripped()
    }

    /// Both streams, colouring removed, as `(output, diagnostics)`.
    pub fn stripped_with_err(self) -> Result<(String, String)> {
        Ok((self.buffer.stripped()?, self.err.stripped()?))
    }
}

impl Write for Writer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.buffer.flush()
    }
}

pub enum WriteBuffer {
    Stdout(Stdout),
    Stderr(Stderr),
    Vec(Vec<u8>),
    File(File),
}

impl WriteBuffer {
    fn into_string(self) -> Result<String> {
        match self {
            WriteBuffer::Vec(vec) => Ok(String::from_utf8(vec)?),
            _ => Err(Error::IllegalArguments(
                "only in-memory buffers can be read back".to_string(),
            )),
        }
    }

    fn stripped(self) -> Result<String> {
        match self {
            WriteBuffer::Vec(vec) => Ok(String::from_utf8(strip_ansi_escapes::strip(vec)?)?),
            _ => Err(Error::IllegalArguments(
                "only in-memory buffers can be read back".to_string(),
            )),
        }
    }
}

impl Write for WriteBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            WriteBuffer::Stdout(stdout) => stdout.write(buf),
            WriteBuffer::Stderr(stderr) => stderr.write(buf),
            WriteBuffer::Vec(vec) => vec.write(buf),
            WriteBuffer::File(file) => file.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            WriteBuffer::Stdout(stdout) => stdout.flush(),
            WriteBuffer::Stderr(stderr) => stderr.flush(),
            WriteBuffer::Vec(vec) => vec.flush(),
            WriteBuffer::File(file) => file.flush(),
        }
    }
}
