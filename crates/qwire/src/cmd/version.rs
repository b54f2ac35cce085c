use qwire::frame::{DEFAULT_MAX_FRAME_SIZE, HEADER_SIZE};
use qwire::ninep::VERSION_9P2000;

use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("qwire {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: qwire");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!("protocol: {VERSION_9P2000}");
    println!("header_size: {HEADER_SIZE}");
    println!("max_frame_size: {DEFAULT_MAX_FRAME_SIZE}");
    println!("target_os: {}", std::env::consts::OS);
    println!("target_arch: {}", std::env::consts::ARCH);
    println!(
        "build_target: {}",
        option_env!("QWIRE_BUILD_TARGET").unwrap_or("unknown")
    );
    println!("git_hash: {}", option_env!("GIT_HASH").unwrap_or("unknown"));

    Ok(SUCCESS)
}
