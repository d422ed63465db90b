use anyhow::{anyhow, Context};
use std::env;

fn main() -> anyhow::Result<()> {
    // Already building for the eBPF target; recursing would never end
    if env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default() == "bpf" {
        return Ok(());
    }

    // XDP requires a Linux kernel and bpf-linker
    if env::consts::OS != "linux" {
        println!(
            "cargo:warning=eBPF compilation skipped on {}. Build the probe on a Linux host.",
            env::consts::OS
        );
        return Ok(());
    }

    let cargo_metadata::Metadata { packages, .. } =
        aya_build::cargo_metadata::MetadataCommand::new()
            .no_deps()
            .exec()
            .context("MetadataCommand::exec")?;

    let ebpf_package = packages
        .into_iter()
        .find(|pkg| pkg.name == "xdpstat-probes")
        .ok_or_else(|| anyhow!("xdpstat-probes package not found"))?;

    aya_build::build_ebpf([ebpf_package])?;

    println!("cargo:rerun-if-changed=../xdpstat-common/src");
    Ok(())
}
