//! Synthesis (reconciliation) prompt construction
//!
//! Serializes a set of successful drafts plus the reconciliation
//! contract into one editor request. Pure text construction, no I/O:
//! the same ordered draft list and policy always produce byte-identical
//! output, and reordering the input reorders the provenance line and
//! the draft blocks correspondingly.

use crate::core::subject::Subject;
use crate::draft::DraftResult;
use serde::{Deserialize, Serialize};

/// How conflict notes in the reconciled CV refer to contributing models.
///
/// Baked into the instruction block once per batch, never decided per
/// call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConflictNotePolicy {
    /// Conflict notes name the drafters on each side of a disagreement.
    #[default]
    NameDrafters,
    /// Conflict notes use generic phrasing ("initial drafts differed")
    /// without naming any drafter.
    Generic,
}

impl ConflictNotePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictNotePolicy::NameDrafters => "named",
            ConflictNotePolicy::Generic => "generic",
        }
    }
}

impl std::str::FromStr for ConflictNotePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "named" => Ok(ConflictNotePolicy::NameDrafters),
            "generic" => Ok(ConflictNotePolicy::Generic),
            other => Err(format!(
                "unknown conflict note policy '{}' (expected 'named' or 'generic')",
                other
            )),
        }
    }
}

/// Builds the reconciliation request sent to each editor.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisPromptBuilder {
    policy: ConflictNotePolicy,
}

impl SynthesisPromptBuilder {
    pub fn new(policy: ConflictNotePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ConflictNotePolicy {
        self.policy
    }

    /// Build the synthesis prompt from the Success-status drafts, in
    /// the order the drafters were originally selected.
    ///
    /// Callers gate on draft count: reconciliation over fewer than two
    /// drafts is never requested, so this function assumes `drafts`
    /// has at least two entries and all of them succeeded.
    pub fn build(&self, subject: &Subject, drafts: &[&DraftResult]) -> String {
        debug_assert!(drafts.len() >= 2);
        debug_assert!(drafts.iter().all(|d| d.is_success()));

        let mut prompt = String::new();

        prompt.push_str(&format!(
            "You are an expert CV editor. Your task is to synthesize a single, \
             comprehensive, and accurate CV for **{}** based on the multiple draft \
             CVs provided below.\n\n\
             Your goal is to produce a 'Refreshed CV' that is the best possible \
             version, combining all valid information and resolving discrepancies \
             where possible.\n\n",
            subject.name()
        ));

        prompt.push_str(
            "Follow this structure for the Refreshed CV (ensure all 12 sections are present if information is available):\n\
             1.  **NAME**: Full name of the individual.\n\
             2.  **GOVERNMENT POSITION**: Current or most recent government position held. (If applicable, otherwise most recent significant professional role).\n\
             3.  **COUNTRY**: The official name of the country they serve/worked in or are primarily associated with.\n\
             4.  **BORN**: Date of birth.\n\
             5.  **AGE**: Current age.\n\
             6.  **MARITAL STATUS**: Information on marital status, including spouse and children if applicable.\n\
             7.  **EDUCATION**: Chronological list of educational achievements (PERIOD, INSTITUTION, DEGREE).\n\
             8.  **CAREER**: Detailed account of the individual's career (YEAR and POSITION).\n\
             9.  **OTHER APPOINTMENTS**: List of other significant appointments.\n\
             10. **AWARDS and DECORATIONS**: List of awards and decorations.\n\
             11. **LANGUAGES**: Languages spoken.\n\
             12. **REMARKS**: Any additional noteworthy information.\n\n",
        );

        prompt.push_str(
            "Instructions for Reconciling and Synthesizing:\n\
             -   Combine information from all provided CVs to make the Refreshed CV as complete as possible.\n\
             -   If different CVs provide different information for the same field (e.g., different dates for a job, different university names for the same degree period), try to determine the most likely correct information. If two or more drafts agree on one version, prefer that.\n\
             -   **Crucially, if you encounter conflicting information that cannot be definitively resolved, or if you make a choice between conflicting pieces of information, you MUST indicate this in the Refreshed CV with an inline note in the relevant section.**\n",
        );
        prompt.push_str(self.conflict_note_instructions());
        prompt.push_str(
            "-   Ensure dates, positions, and achievements are accurately represented based on the consensus or noted discrepancies.\n\
             -   If one CV provides more detail for a specific role or achievement, incorporate that richer detail.\n\
             -   Omit any redundant information if multiple CVs state the exact same fact.\n\
             -   The final output should be ONLY the complete 'Refreshed CV' with inline notes for discrepancies. Do not add any other commentary before or after the CV.\n\n",
        );

        // Provenance: contributing drafters in original selection order.
        let names: Vec<&str> = drafts.iter().map(|d| d.drafter.as_str()).collect();
        prompt.push_str(&format!(
            "The draft CVs were generated by the following models: {}.\n\
             The CVs are contained in the tags below.\n\n\
             Here are the draft CVs:\n\n",
            names.join(", ")
        ));

        for draft in drafts {
            prompt.push_str(&format!(
                "<answer_{name}>\n(CV from **{name}**)\n\n--- CV Start ---\n{text}\n--- CV End ---\n\n--- Sources listed by {name} ---\n{sources}\n--- Sources End ---\n\n</answer_{name}>\n\n",
                name = draft.drafter,
                text = draft.text,
                sources = draft.sources.render(),
            ));
        }

        prompt
    }

    fn conflict_note_instructions(&self) -> &'static str {
        match self.policy {
            ConflictNotePolicy::NameDrafters => {
                "    -   For example: \"*2018-2022: Chief Technology Officer, Innovate Corp. (Note: Discrepancy in end year; Sonar reported 2022, Deepseek reported 2023)*\"\n\
                 \x20   -   Or: \"*Education: MSc in Advanced Computing (Source: Gemini) / Master of Science in Computer Engineering (Source: Optima) from Tech University, 2015-2017.*\"\n\
                 \x20   -   Clearly state the source of conflicting information (e.g., 'Sonar stated X, while Claude stated Y'). When noting a discrepancy, refer to the model by its name (e.g., **Sonar**, **Gemini**).\n"
            }
            ConflictNotePolicy::Generic => {
                "    -   For example: \"*2018-2022: Chief Technology Officer, Innovate Corp. (Note: initial drafts differed on the end year)*\"\n\
                 \x20   -   Use generic phrasing such as '(Note: initial drafts differed on this point)'. Do not name any contributing model in the notes.\n"
            }
        }
    }
}
