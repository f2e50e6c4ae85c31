// Tests module
// Election invariants: end-to-end properties of the candidate election
// over a live registry and ledger
