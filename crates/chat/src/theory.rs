//! Static reference text given to the chat service as grounding context.

/// Summary of the boundary-flip model the particle view illustrates.
pub const THEORY_CONTEXT: &str = "\
Boundary-flip model

1. Flip function
A scalar F(r) of the radial distance r vanishes at the boundary radius Rs.
F(r) > 0: normal region, metric signature (-,+,+,+).
F(r) < 0: flipped region, signature (+,+,-,+).
F(r) = 0: the signature is undefined and the region cannot be projected
for an observer.

2. Entropy
Local entropy obeys dS/dr = k / F(r), so it diverges as F(r) -> 0 and the
sign change of F marks a loss of projectable information.

3. Attractor
The boundary acts as an attractor: dr/dt = -alpha / (r - Rs).

4. Orientation operator
Omega(r) = sgn(F(r)). Omega = +1 is normal space, Omega = -1 is flipped
space, Omega = 0 is the transition that cannot be rendered.

5. Consequences
The flip zone is invisible, so the object appears black. Information is not
lost, only unprojectable. The flipped region M' = { x : Omega(x) = -1 } is a
dual of the observable one.
";

/// System instruction sent with every chat request.
pub fn system_instruction() -> String {
    format!(
        "You are a theoretical physicist who explains the boundary-flip model.\n\
         Treat the following text as the source of truth for the theory:\n\
         ---\n{THEORY_CONTEXT}---\n\
         Explain concepts clearly. Use plain text or simple notation for math.\n\
         When discussing the flip, emphasize the change of topological orientation.\n\
         Be concise."
    )
}
