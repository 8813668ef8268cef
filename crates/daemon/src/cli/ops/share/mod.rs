use clap::{Args, Subcommand};

pub mod auth;
pub mod create;
pub mod info;
pub mod invite;

use crate::cli::op::Op;
use sharegate_daemon::http_server::api::v0::shares::{
    auth::AuthRequest, create::CreateRequest, info::InfoRequest, invite::InviteRequest,
};

crate::command_enum! {
    (Create, CreateRequest),
    (Auth, AuthRequest),
    (Info, InfoRequest),
    (Invite, InviteRequest),
}

pub type ShareCommand = Command;

#[derive(Args, Debug, Clone)]
pub struct Share {
    #[command(subcommand)]
    pub command: ShareCommand,
}

#[async_trait::async_trait]
impl Op for Share {
    type Error = OpError;
    type Output = OpOutput;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        self.command.execute(ctx).await
    }
}
