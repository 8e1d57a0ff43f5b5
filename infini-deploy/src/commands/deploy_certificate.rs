// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

use infini_tools::{core::declaration::ClassHashSource, ops};

use crate::{
    common_args::{CertificateArgs, NetworkArgs, PathArgs},
    error::InfiniResult,
};

#[derive(Debug, clap::Args)]
pub struct Args {
    /// Declare the certificate contract before deploying it.
    #[arg(long)]
    declare: bool,

    #[command(flatten)]
    certificate: CertificateArgs,
    #[command(flatten)]
    network: NetworkArgs,
}

pub async fn exec(args: Args, paths: &PathArgs) -> InfiniResult {
    let ctx = args.network.context(paths)?;
    let certificate = args.certificate;
    let request = ops::CertificateRequest {
        owner: certificate.owner,
        name: certificate.name,
        metadata: certificate.metadata,
        class_hash: ClassHashSource::from_flags(certificate.class_hash, args.declare),
    };
    ops::deploy_certificate(&ctx, &request).await?;
    Ok(())
}
