//! Archive fixtures shared by the core tests.

use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;

pub enum Entry<'a> {
    File {
        name: &'a str,
        data: &'a [u8],
        mode: u32,
    },
    Dir {
        name: &'a str,
    },
}

/// Build a gzip-compressed tar archive in memory.
pub fn gzipped_tarball(entries: &[Entry<'_>]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());

    for entry in entries {
        match entry {
            Entry::File { name, data, mode } => {
                let mut header = tar::Header::new_gnu();
                header.set_size(data.len() as u64);
                header.set_mode(*mode);
                header.set_cksum();
                builder.append_data(&mut header, name, *data).unwrap();
            }
            Entry::Dir { name } => {
                let mut header = tar::Header::new_gnu();
                header.set_entry_type(tar::EntryType::Directory);
                header.set_size(0);
                header.set_mode(0o755);
                header.set_cksum();
                builder.append_data(&mut header, name, &b""[..]).unwrap();
            }
        }
    }

    let tar_bytes = builder.into_inner().unwrap();
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&tar_bytes).unwrap();
    encoder.finish().unwrap()
}

/// Archive holding a single shell script that exits with `code`.
#[cfg(unix)]
pub fn exit_script_archive(name: &str, code: i32) -> Vec<u8> {
    let script = format!("#!/bin/sh\nexit {code}\n");
    gzipped_tarball(&[Entry::File {
        name,
        data: script.as_bytes(),
        mode: 0o755,
    }])
}
