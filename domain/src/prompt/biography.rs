//! Biography extraction prompt
//!
//! The instruction document sent to every drafter. Pure text
//! construction: given the same `(subject, reference_date)` the output
//! is byte-identical. The reference date is injected by the caller so
//! age arithmetic inside the generated CV stays anchored to a known
//! point, and so this module never touches the wall clock.

use crate::core::subject::Subject;

/// Builds the 12-section biography prompt.
pub struct BiographyPrompt;

impl BiographyPrompt {
    /// Render the full drafter prompt for one subject.
    ///
    /// `reference_date` is a human-readable month/year ("May 2025")
    /// used for the age calculation and the knowledge-cutoff framing.
    pub fn render(subject: &Subject, reference_date: &str) -> String {
        format!(
            r#"###Instruction###
Create a comprehensive biography of {subject} detailing the personal background, education, career progression, and other significant appointments or achievements. The biography should be structured as follows:

1.  **NAME**: Full name of the individual.
2.  **GOVERNMENT POSITION**: Current or most recent government position held. (If applicable, otherwise most recent significant professional role).
3.  **COUNTRY**: The official name of the country they serve/worked in or are primarily associated with.
4.  **BORN**: Date of birth.
5.  **AGE**: Current age. Calculate the difference between the current date ({reference_date}) and the date of birth.
6.  **MARITAL STATUS**: Information on marital status, including spouse and children if applicable. String format.
7.  **EDUCATION**: Chronological list of educational achievements, including institutions attended and degrees or qualifications obtained. Give the breakdown in the form of PERIOD, INSTITUTION, DEGREE.
8.  **CAREER**: Detailed account of the individual's career, including positions held, dates of service, and any promotions or notable responsibilities. This section can be continued as needed (e.g., "Career (cont'd)"). Do not miss the details of all promotions and double hatting positions. Give the breakdown in the form of YEAR and POSITION.
9.  **OTHER APPOINTMENTS**: List of other significant appointments, roles, or contributions outside of their main career path.
10. **AWARDS and DECORATIONS**: List of awards and decorations received.
11. **LANGUAGES**: Languages spoken.
12. **REMARKS**: Any additional noteworthy information or personal achievements, including familial connections to other notable figures if relevant.

This format is designed to provide a clear and detailed overview of an individual's professional and personal life, highlighting their contributions and achievements in a structured manner. Use up-to-date information available up to {reference_date}.

###Information###
[INFO]

###Biography###"#,
            subject = subject.name(),
            reference_date = reference_date,
        )
    }

    /// Split a rendered prompt into `(system, user)` parts for providers
    /// that take a separate system prompt.
    ///
    /// The instruction body between `###Instruction###` and
    /// `###Information###` becomes the system prompt; the remainder,
    /// starting at `###Information###`, stays in the user message. A
    /// prompt without the markers is passed through unchanged as the
    /// user message.
    pub fn split_system_user(prompt: &str) -> (Option<String>, String) {
        let Some((_, after_instruction)) = prompt.split_once("###Instruction###") else {
            return (None, prompt.to_string());
        };

        match after_instruction.split_once("###Information###") {
            Some((instruction, rest)) => (
                Some(instruction.trim().to_string()),
                format!("###Information###{}", rest),
            ),
            None => (Some(after_instruction.trim().to_string()), String::new()),
        }
    }
}
