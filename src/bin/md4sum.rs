use md4_engine::{digest_to_hex, Case, Md4, MD4_LEN};

use rayon::prelude::*;

use std::io::Read;

const CHUNK_SIZE: usize = 8192;
const STDIN_NAME: &str = "-";

fn main() {
    let mut case = Case::Lower;
    let mut names = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--upper" => case = Case::Upper,
            "--lower" => case = Case::Lower,
            "-h" | "--help" => {
                println!("usage: md4sum [--upper|--lower] [FILE]...");
                return;
            }
            _ => names.push(arg),
        }
    }
    if names.is_empty() {
        names.push(STDIN_NAME.to_string());
    }

    let results: Vec<Result<[u8; MD4_LEN], String>> =
        names.par_iter().map(|name| digest_named(name)).collect();

    let mut failed = false;
    for (name, result) in names.iter().zip(results) {
        match result {
            Ok(digest) => println!("{}  {}", digest_to_hex(&digest, case), name),
            Err(e) => {
                eprintln!("md4sum: {e}");
                failed = true;
            }
        }
    }
    if failed {
        std::process::exit(1);
    }
}

fn digest_named(name: &str) -> Result<[u8; MD4_LEN], String> {
    if name == STDIN_NAME {
        return digest_reader(std::io::stdin().lock(), name);
    }
    let file = std::fs::File::open(name).map_err(|e| format!("{name}: {e}"))?;
    digest_reader(file, name)
}

fn digest_reader<R: Read>(mut reader: R, name: &str) -> Result<[u8; MD4_LEN], String> {
    let mut md4 = Md4::new();
    let mut chunk = [0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(format!("{name}: {e}")),
        };
        md4.update(&chunk[..n]);
    }
    Ok(md4.digest())
}
