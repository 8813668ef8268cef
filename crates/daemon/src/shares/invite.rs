use pulldown_cmark::{html, Event, Parser};
use url::Url;
use uuid::Uuid;

use super::{ShareError, Shares};
use crate::access::{Accountability, Action, SHARES_COLLECTION};
use crate::database::Share;
use crate::directory::UNKNOWN_USER;
use crate::mail::MailMessage;

pub const INVITATION_SUBJECT: &str = "You've been invited to a shared item";

/// Deep link recipients open to reach the share
pub fn share_link(public_url: &Url, share_id: Uuid) -> String {
    format!(
        "{}/admin/shared/{}",
        public_url.as_str().trim_end_matches('/'),
        share_id
    )
}

/// Render the invitation body as HTML
///
/// Raw HTML in the inviter or collection name is emitted as text.
pub fn compose_invitation(
    inviter: &str,
    collection: &str,
    public_url: &Url,
    share_id: Uuid,
) -> String {
    let markdown = format!(
        "Hello!\n\n{} has invited you to view an item in {}.\n\n[Open]({})\n",
        inviter,
        collection,
        share_link(public_url, share_id)
    );

    let mut html_output = String::new();
    let parser = Parser::new(&markdown).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    html::push_html(&mut html_output, parser);
    html_output
}

impl Shares {
    /// Email an invitation to view `share_id` to each recipient.
    ///
    /// Anonymous callers are refused before anything is read or sent.
    /// Messages go out one at a time; the first failed send aborts the
    /// remaining recipients.
    pub async fn invite(
        &self,
        accountability: &Accountability,
        share_id: Uuid,
        emails: &[String],
    ) -> Result<(), ShareError> {
        let Some(user) = accountability.user else {
            return Err(ShareError::Forbidden);
        };

        if let Some(bad) = emails.iter().find(|e| !e.contains('@')) {
            return Err(ShareError::Invalid(format!("not an email address: {}", bad)));
        }

        self.access
            .check_access(
                accountability,
                Action::Read,
                SHARES_COLLECTION,
                &share_id.to_string(),
            )
            .await?;
        let share = Share::get(share_id, &self.db)
            .await?
            .ok_or(ShareError::NotFound)?;

        let inviter = self
            .directory
            .lookup(user)
            .await?
            .map(|profile| profile.display_name())
            .unwrap_or_else(|| UNKNOWN_USER.to_string());

        let html = compose_invitation(&inviter, &share.collection, &self.config.public_url, share_id);

        for email in emails {
            self.mailer
                .send(MailMessage {
                    to: email.clone(),
                    subject: INVITATION_SUBJECT.to_string(),
                    html: html.clone(),
                })
                .await?;
        }

        tracing::info!(share = %share_id, recipients = emails.len(), "share invitations sent");
        Ok(())
    }
}
