pub(crate) fn run() {
    println!("{}", fedi_backfill_export::template_declaration());
}
