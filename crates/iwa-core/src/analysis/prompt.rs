//! Instruction prompt sent with every document.

/// Asks the model to classify the document as an administrative or criminal
/// warrant and explain the recipient's obligations in plain language.
pub const WARRANT_PROMPT: &str = r#"Analyze the attached warrant document. Determine whether it is an administrative warrant or a criminal warrant.

- A valid judicial subpoena requires 1) the name of the issuing court, 2) the signature of a judge or federal court clerk, 3) the target of the subpoena (e.g. FERPA information), and 4) the address of the target of the subpoena (e.g. the school).
- An administrative subpoena (an "ICE subpoena" or "immigration subpoena") is NOT valid.

- A valid judicial warrant requires 1) the name of the issuing court, 2) the signature of a judge or magistrate, 3) the target of the warrant (the address AND area to be searched), and 4) a current date.
- An administrative warrant ("ICE warrant" or "immigration subpoena") will usually be titled "Warrant of Removal/Deportation", will not contain the name of a court or the signature of a judge or magistrate, and is NOT valid.

Your answer should:

1. Clearly state whether the warrant is administrative or criminal.

2. Explain what the recipient's obligations are based on the type of warrant. Importantly, explain if the recipient is required to allow an agent into their home or business based on the type of warrant.

3. Provide a brief explanation of why the warrant is administrative or criminal.

Your answer should be short and clear. Use language that is easy to understand for a non-legal audience, at a 6th grade reading level or below."#;
