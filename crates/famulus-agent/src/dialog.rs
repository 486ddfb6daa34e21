// SPDX-FileCopyrightText: 2026 Famulus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Email composer: a strictly linear per-conversation dialog.
//!
//! The flow collects subject, body, recipient, reply-to address, and
//! sender name one stage at a time, then asks for confirmation. Invalid
//! input answers with a corrective prompt and leaves the stage unchanged;
//! the dialog never advances past an invalid address.

use std::sync::LazyLock;

use famulus_core::types::MailMessage;
use regex::Regex;

/// Opening banner sent when `!email` starts a composition.
pub const BANNER: &str = "*Composing E-mail* 📧\n\
You're composing an e-mail now!\n\
\n\
Type *!discard* to discard anytime.\n\
Type *!draft* to save as draft.\n\
\n\
So, what's the subject?";

// RFC-5322-lite: localpart@domain with at least one dot in the domain.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)+$").unwrap()
});

/// Checks an address against the composer's fixed validity pattern.
pub fn is_valid_email(address: &str) -> bool {
    EMAIL_RE.is_match(address)
}

/// The field currently being collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Subject,
    Body,
    Target,
    ReplyTo,
    Name,
    Confirm,
}

/// Partially or fully collected composition fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MailDraft {
    pub subject: String,
    pub body: String,
    pub target: String,
    pub reply_to: String,
    pub name: String,
}

impl MailDraft {
    /// Renders the draft the way the confirm stage shows it; `confirm`
    /// appends the send prompt.
    pub fn preview(&self, confirm: bool) -> String {
        let mut text = format!(
            "To: {}\n\nFrom: {} <{}>\nSubject: {}\nMessage: {}\n\n--- End of the E-mail ---",
            self.target, self.name, self.reply_to, self.subject, self.body
        );
        if confirm {
            text.push_str("\n\n*Confirm Send? <yes>*");
        }
        text
    }

    fn into_mail(self) -> MailMessage {
        MailMessage {
            subject: self.subject,
            body: self.body,
            to: self.target,
            reply_to: self.reply_to,
            from_name: self.name,
        }
    }
}

/// An in-progress composition for one conversation.
#[derive(Debug, Clone)]
pub struct Dialog {
    stage: Stage,
    draft: MailDraft,
}

/// What the caller must do after one dialog turn.
#[derive(Debug)]
pub enum Step {
    /// Stay in the dialog and send this prompt.
    Prompt(Dialog, String),
    /// Composition confirmed: dispatch this mail and leave the dialog.
    Send(MailMessage),
    /// Composition ended without sending: park the draft, send this reply.
    SaveDraft(MailDraft, String),
}

impl Dialog {
    /// Starts a fresh composition at the subject stage.
    pub fn begin() -> (Self, &'static str) {
        (
            Self {
                stage: Stage::Subject,
                draft: MailDraft::default(),
            },
            BANNER,
        )
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Surrenders the partial draft, for `!draft` mid-composition.
    pub fn into_draft(self) -> MailDraft {
        self.draft
    }

    /// Consumes one (pre-trimmed) input line and produces the next step.
    pub fn advance(mut self, input: &str) -> Step {
        match self.stage {
            Stage::Subject => {
                if input.is_empty() {
                    return Step::Prompt(self, "Please enter subject 😒".to_string());
                }
                self.draft.subject = input.to_string();
                self.stage = Stage::Body;
                Step::Prompt(self, "Alright, What's the message?".to_string())
            }
            Stage::Body => {
                if input.is_empty() {
                    return Step::Prompt(self, "Please enter some message 😒".to_string());
                }
                self.draft.body = input.to_string();
                self.stage = Stage::Target;
                Step::Prompt(self, "Noted, To where should I send this e-mail?".to_string())
            }
            Stage::Target => {
                if input.is_empty() {
                    return Step::Prompt(
                        self,
                        "Please enter e-mail address of the recipient. 😒".to_string(),
                    );
                }
                if !is_valid_email(input) {
                    return Step::Prompt(
                        self,
                        "Please enter a valid e-mail address. 😒".to_string(),
                    );
                }
                self.draft.target = input.to_string();
                self.stage = Stage::ReplyTo;
                Step::Prompt(
                    self,
                    "Enter your e-mail address, It will set as reply-to on the mail.".to_string(),
                )
            }
            Stage::ReplyTo => {
                if input.is_empty() {
                    return Step::Prompt(self, "Please your e-mail address. 😒".to_string());
                }
                if !is_valid_email(input) {
                    return Step::Prompt(
                        self,
                        "Please enter a valid e-mail address. 😒".to_string(),
                    );
                }
                self.draft.reply_to = input.to_string();
                self.stage = Stage::Name;
                Step::Prompt(
                    self,
                    "Okay, What should be the name on the e-mail?".to_string(),
                )
            }
            Stage::Name => {
                if input.is_empty() {
                    return Step::Prompt(self, "Please enter your name 😒".to_string());
                }
                self.draft.name = input.to_string();
                self.stage = Stage::Confirm;
                let preview = self.draft.preview(true);
                Step::Prompt(self, preview)
            }
            Stage::Confirm => {
                if input.eq_ignore_ascii_case("yes") || input.eq_ignore_ascii_case("yus") {
                    Step::Send(self.draft.into_mail())
                } else {
                    Step::SaveDraft(
                        self.draft,
                        "E-mail saved to draft. Type !draft to check it.".to_string(),
                    )
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk_to_confirm() -> Dialog {
        let (dialog, _) = Dialog::begin();
        let Step::Prompt(dialog, _) = dialog.advance("S") else {
            panic!("subject should advance");
        };
        let Step::Prompt(dialog, _) = dialog.advance("B") else {
            panic!("body should advance");
        };
        let Step::Prompt(dialog, _) = dialog.advance("a@b.co") else {
            panic!("target should advance");
        };
        let Step::Prompt(dialog, _) = dialog.advance("c@d.co") else {
            panic!("reply-to should advance");
        };
        let Step::Prompt(dialog, preview) = dialog.advance("N") else {
            panic!("name should advance");
        };
        assert!(preview.contains("To: a@b.co"));
        assert!(preview.contains("From: N <c@d.co>"));
        assert!(preview.contains("Subject: S"));
        assert!(preview.contains("Message: B"));
        assert!(preview.ends_with("*Confirm Send? <yes>*"));
        dialog
    }

    #[test]
    fn banner_asks_for_the_subject() {
        let (dialog, banner) = Dialog::begin();
        assert_eq!(dialog.stage(), Stage::Subject);
        assert!(banner.starts_with("*Composing E-mail* 📧"));
        assert!(banner.ends_with("So, what's the subject?"));
    }

    #[test]
    fn confirmed_composition_yields_the_mail() {
        let dialog = walk_to_confirm();
        let Step::Send(mail) = dialog.advance("yes") else {
            panic!("yes should send");
        };
        assert_eq!(mail.subject, "S");
        assert_eq!(mail.body, "B");
        assert_eq!(mail.to, "a@b.co");
        assert_eq!(mail.reply_to, "c@d.co");
        assert_eq!(mail.from_name, "N");
    }

    #[test]
    fn confirm_accepts_yus_in_any_case() {
        let dialog = walk_to_confirm();
        assert!(matches!(dialog.advance("YUS"), Step::Send(_)));
    }

    #[test]
    fn any_other_confirm_text_parks_the_draft() {
        let dialog = walk_to_confirm();
        let Step::SaveDraft(draft, reply) = dialog.advance("hmm no") else {
            panic!("non-yes should save the draft");
        };
        assert_eq!(draft.subject, "S");
        assert_eq!(reply, "E-mail saved to draft. Type !draft to check it.");
    }

    #[test]
    fn empty_subject_repeats_the_stage() {
        let (dialog, _) = Dialog::begin();
        let Step::Prompt(dialog, prompt) = dialog.advance("") else {
            panic!("empty subject should prompt");
        };
        assert_eq!(prompt, "Please enter subject 😒");
        assert_eq!(dialog.stage(), Stage::Subject);
    }

    #[test]
    fn invalid_target_address_never_advances() {
        let (dialog, _) = Dialog::begin();
        let Step::Prompt(dialog, _) = dialog.advance("S") else {
            panic!()
        };
        let Step::Prompt(dialog, _) = dialog.advance("B") else {
            panic!()
        };
        let Step::Prompt(dialog, prompt) = dialog.advance("not-an-address") else {
            panic!()
        };
        assert_eq!(prompt, "Please enter a valid e-mail address. 😒");
        assert_eq!(dialog.stage(), Stage::Target);
    }

    #[test]
    fn draft_preview_without_confirm_line() {
        let draft = MailDraft {
            subject: "S".into(),
            body: "B".into(),
            target: "a@b.co".into(),
            reply_to: "c@d.co".into(),
            name: "N".into(),
        };
        let shown = draft.preview(false);
        assert!(shown.ends_with("--- End of the E-mail ---"));
        assert!(!shown.contains("Confirm Send?"));
    }

    #[test]
    fn email_pattern_requires_a_dotted_domain() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last+tag@sub.domain.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.co"));
        assert!(!is_valid_email("a@.co"));
        assert!(!is_valid_email("a b@c.de"));
        assert!(!is_valid_email("plainaddress"));
    }
}
