//! Email templates for invitations and completion notices.

use chrono::{DateTime, Utc};

use vouch_core::Notification;

/// Rendered content for an outbound email.
pub struct EmailContent {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl EmailContent {
    /// Render the template matching a notification.
    pub fn for_notification(notification: &Notification) -> Self {
        match notification {
            Notification::InvitationIssued {
                referee_name,
                share_link,
                expires_at,
            } => Self::invitation_issued(referee_name, share_link, *expires_at),
            Notification::ReferenceCompleted {
                referee_name,
                overall_rating,
            } => Self::reference_completed(referee_name, *overall_rating),
        }
    }

    fn invitation_issued(referee_name: &str, share_link: &str, expires_at: DateTime<Utc>) -> Self {
        let expires = expires_at.format("%B %e, %Y");
        Self {
            subject: "You've been asked to provide a reference".to_string(),
            text: format!(
                r#"Hi {referee_name},

You've been asked to provide a professional reference.

Open this link to review the request and submit your answers:

{share_link}

The link is personal to you and expires on {expires}.

If you don't recognize this request, please ignore this email.

--
Vouch References"#
            ),
            html: format!(
                r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif; line-height: 1.6; color: #333; margin: 0; padding: 0; background: #f5f5f5; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 40px 20px; }}
        .card {{ background: white; border-radius: 8px; padding: 40px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}
        h1 {{ color: #1a1a1a; margin-top: 0; font-size: 24px; }}
        .button {{ display: inline-block; padding: 14px 28px; background: #2563eb; color: white; border-radius: 8px; text-decoration: none; font-weight: bold; margin: 24px 0; }}
        .expires {{ color: #666; font-size: 14px; }}
        .footer {{ margin-top: 32px; padding-top: 20px; border-top: 1px solid #eee; color: #888; font-size: 12px; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="card">
            <h1>Hi {referee_name},</h1>
            <p>You've been asked to provide a professional reference.</p>
            <p><a class="button" href="{share_link}">Submit your reference</a></p>
            <p class="expires">The link is personal to you and expires on {expires}.</p>
            <div class="footer">
                <p>If you don't recognize this request, please ignore this email.</p>
                <p>Vouch References</p>
            </div>
        </div>
    </div>
</body>
</html>"#
            ),
        }
    }

    fn reference_completed(referee_name: &str, overall_rating: f64) -> Self {
        Self {
            subject: format!("{} submitted their reference", referee_name),
            text: format!(
                r#"Good news!

{referee_name} has completed the reference you requested.

Overall rating: {overall_rating:.1} / 5

Sign in to your dashboard to read the full feedback.

--
Vouch References"#
            ),
            html: format!(
                r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif; line-height: 1.6; color: #333; margin: 0; padding: 0; background: #f5f5f5; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 40px 20px; }}
        .card {{ background: white; border-radius: 8px; padding: 40px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}
        h1 {{ color: #1a1a1a; margin-top: 0; font-size: 24px; }}
        .rating {{ font-size: 36px; font-weight: bold; color: #2563eb; text-align: center; padding: 24px; background: #f0f7ff; border-radius: 8px; margin: 24px 0; }}
        .footer {{ margin-top: 32px; padding-top: 20px; border-top: 1px solid #eee; color: #888; font-size: 12px; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="card">
            <h1>Reference received</h1>
            <p>{referee_name} has completed the reference you requested.</p>
            <div class="rating">{overall_rating:.1} / 5</div>
            <p>Sign in to your dashboard to read the full feedback.</p>
            <div class="footer">
                <p>Vouch References</p>
            </div>
        </div>
    </div>
</body>
</html>"#
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invitation_email_contains_link() {
        let content = EmailContent::for_notification(&Notification::InvitationIssued {
            referee_name: "Jordan".to_string(),
            share_link: "https://vouch.example.com/reference?token=abc123".to_string(),
            expires_at: Utc::now(),
        });
        assert!(content.text.contains("token=abc123"));
        assert!(content.html.contains("token=abc123"));
        assert!(content.text.contains("Jordan"));
    }

    #[test]
    fn test_completion_email_contains_rating() {
        let content = EmailContent::for_notification(&Notification::ReferenceCompleted {
            referee_name: "Jordan".to_string(),
            overall_rating: 4.5,
        });
        assert!(content.subject.contains("Jordan"));
        assert!(content.text.contains("4.5 / 5"));
        assert!(content.html.contains("4.5 / 5"));
    }
}
